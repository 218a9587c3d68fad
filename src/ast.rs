//! Abstract Syntax Tree for mathematical expressions

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::EvalError;
use crate::functions;

/// Tolerance for floating point comparisons
pub const FLOAT_TOLERANCE: f64 = 1e-10;

/// Global counter for expression IDs
static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    EXPR_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Check if a name is a recognized mathematical constant
#[inline]
pub fn is_known_constant(name: &str) -> bool {
    matches!(name, "pi" | "e")
}

/// Get the numeric value of a recognized constant, if it matches
#[inline]
pub fn get_constant_value(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    /// Unique ID for debugging (not used in equality comparisons)
    pub id: u64,
    pub kind: ExprKind,
}

/// The actual expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Symbol(String),
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

// Implement Eq and Hash based on KIND only for structural equality
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl std::hash::Hash for ExprKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ExprKind::Number(n) => n.to_bits().hash(state),
            ExprKind::Symbol(s) => s.hash(state),
            ExprKind::FunctionCall { name, args } => {
                name.hash(state);
                args.hash(state);
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.hash(state);
                r.hash(state);
            }
        }
    }
}

impl Expr {
    /// Create a new expression with a unique ID
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            id: next_id(),
            kind,
        }
    }

    /// Extract the numeric value if this is a Number node
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if this is the number zero (within tolerance)
    pub fn is_zero_num(&self) -> bool {
        matches!(&self.kind, ExprKind::Number(n) if n.abs() < FLOAT_TOLERANCE)
    }

    /// Check if this is the number one (within tolerance)
    pub fn is_one_num(&self) -> bool {
        matches!(&self.kind, ExprKind::Number(n) if (n - 1.0).abs() < FLOAT_TOLERANCE)
    }

    /// Check if this is the number negative one (within tolerance)
    pub fn is_neg_one_num(&self) -> bool {
        matches!(&self.kind, ExprKind::Number(n) if (n + 1.0).abs() < FLOAT_TOLERANCE)
    }

    /// Create a number literal
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    /// Create a symbol (variable or named constant)
    pub fn symbol(s: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Symbol(s.as_ref().to_string()))
    }

    /// Create an addition node
    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    /// Create a subtraction node
    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    /// Create a multiplication node
    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    /// Create a division node
    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    /// Create a power node
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// Create a single-argument function call
    pub fn func(name: impl Into<String>, content: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![content],
        })
    }

    /// Create a function call with an argument list
    pub fn func_multi(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args,
        })
    }

    /// Count the total number of nodes in this expression tree
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Maximum nesting depth of this expression tree
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check whether the given variable occurs anywhere in this expression
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Number(_) => false,
            ExprKind::Symbol(s) => s == var,
            ExprKind::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var(var)),
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => l.contains_var(var) || r.contains_var(var),
        }
    }

    /// Collect all symbols occurring in this expression, constants included
    pub fn variables(&self) -> HashSet<String> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut HashSet<String>) {
        match &self.kind {
            ExprKind::Number(_) => {}
            ExprKind::Symbol(s) => {
                vars.insert(s.clone());
            }
            ExprKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
        }
    }

    /// Symbolically differentiate with respect to the given variable
    pub fn diff(&self, var: &str) -> Result<Expr, EvalError> {
        crate::differentiation::derive(self, var)
    }

    /// Return a simplified copy of this expression
    pub fn simplified(&self) -> Expr {
        crate::simplification::simplify(self)
    }

    /// Numerically evaluate with the plot variables bound to `x` and `y`.
    ///
    /// Arithmetic follows IEEE 754 throughout: division by zero and
    /// domain violations surface as NaN or infinity rather than as
    /// errors, so callers decide what non-finite results mean.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match &self.kind {
            ExprKind::Number(n) => *n,
            ExprKind::Symbol(s) => match s.as_str() {
                "x" => x,
                "y" => y,
                other => get_constant_value(other).unwrap_or(f64::NAN),
            },
            ExprKind::FunctionCall { name, args } => {
                let vals: Vec<f64> = args.iter().map(|a| a.evaluate(x, y)).collect();
                match functions::lookup(name) {
                    Some(def) => (def.eval)(&vals).unwrap_or(f64::NAN),
                    None => f64::NAN,
                }
            }
            ExprKind::Add(l, r) => l.evaluate(x, y) + r.evaluate(x, y),
            ExprKind::Sub(l, r) => l.evaluate(x, y) - r.evaluate(x, y),
            ExprKind::Mul(l, r) => l.evaluate(x, y) * r.evaluate(x, y),
            ExprKind::Div(l, r) => l.evaluate(x, y) / r.evaluate(x, y),
            // Note: 0^0 evaluates to 1.0 following IEEE 754 powf behavior
            ExprKind::Pow(b, e) => b.evaluate(x, y).powf(e.evaluate(x, y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let val = 314.0 / 100.0;
        let num = Expr::number(val);
        match &num.kind {
            ExprKind::Number(n) => assert_eq!(*n, val),
            _ => panic!("Expected Number variant"),
        }

        let sym = Expr::symbol("x");
        match &sym.kind {
            ExprKind::Symbol(s) => assert_eq!(s, "x"),
            _ => panic!("Expected Symbol variant"),
        }

        let add = Expr::add_expr(Expr::number(1.0), Expr::number(2.0));
        match &add.kind {
            ExprKind::Add(_, _) => (),
            _ => panic!("Expected Add variant"),
        }
    }

    #[test]
    fn test_ids() {
        let e1 = Expr::number(1.0);
        let e2 = Expr::number(1.0);
        let e3 = Expr::number(2.0);

        assert_ne!(e1.id, e2.id); // IDs must be unique
        assert_eq!(e1, e2); // Structural equality should pass
        assert_ne!(e1, e3); // Different values
    }

    #[test]
    fn test_node_count() {
        let x = Expr::symbol("x");
        assert_eq!(x.node_count(), 1);

        // x^2 + y^2 has 7 nodes
        let sum = Expr::add_expr(
            Expr::pow(Expr::symbol("x"), Expr::number(2.0)),
            Expr::pow(Expr::symbol("y"), Expr::number(2.0)),
        );
        assert_eq!(sum.node_count(), 7);
        assert_eq!(sum.max_depth(), 3);
    }

    #[test]
    fn test_contains_var() {
        let expr = Expr::mul_expr(Expr::symbol("x"), Expr::func("sin", Expr::symbol("y")));
        assert!(expr.contains_var("x"));
        assert!(expr.contains_var("y"));
        assert!(!expr.contains_var("z"));
    }

    #[test]
    fn test_evaluate_polynomial() {
        // x^2 + y^2 at (3, 4) = 25
        let expr = Expr::add_expr(
            Expr::pow(Expr::symbol("x"), Expr::number(2.0)),
            Expr::pow(Expr::symbol("y"), Expr::number(2.0)),
        );
        assert_eq!(expr.evaluate(3.0, 4.0), 25.0);
        assert_eq!(expr.evaluate(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_evaluate_constants() {
        let expr = Expr::func("sin", Expr::symbol("pi"));
        assert!(expr.evaluate(0.0, 0.0).abs() < 1e-10);

        let e = Expr::func("ln", Expr::symbol("e"));
        assert!((e.evaluate(0.0, 0.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_evaluate_undefined_is_nan() {
        // ln of a negative number has no real value
        let expr = Expr::func("ln", Expr::symbol("x"));
        assert!(expr.evaluate(-1.0, 0.0).is_nan());

        // 1/x at x = 0 diverges
        let div = Expr::div_expr(Expr::number(1.0), Expr::symbol("x"));
        assert!(div.evaluate(0.0, 0.0).is_infinite());
    }

    #[test]
    fn test_variables() {
        let expr = Expr::add_expr(
            Expr::mul_expr(Expr::symbol("x"), Expr::symbol("y")),
            Expr::symbol("pi"),
        );
        let vars = expr.variables();
        assert!(vars.contains("x"));
        assert!(vars.contains("y"));
        assert!(vars.contains("pi"));
        assert_eq!(vars.len(), 3);
    }
}
