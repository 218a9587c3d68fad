//! Lightweight expression cleanup
//!
//! A single bottom-up pass that folds numeric subtrees and removes
//! arithmetic identities left behind by differentiation. Function calls
//! stay symbolic so `sin(1)` prints as written.

use crate::ast::{Expr, ExprKind};

/// Simplify an expression tree for display and evaluation
pub(crate) fn simplify(expr: &Expr) -> Expr {
    match &expr.kind {
        ExprKind::Number(_) | ExprKind::Symbol(_) => expr.clone(),

        ExprKind::FunctionCall { name, args } => {
            let args: Vec<Expr> = args.iter().map(simplify).collect();
            Expr::func_multi(name.clone(), args)
        }

        ExprKind::Add(a, b) => {
            let ea = simplify(a);
            let eb = simplify(b);
            match (&ea.kind, &eb.kind) {
                (ExprKind::Number(x), ExprKind::Number(y)) => Expr::number(x + y),
                _ if ea.is_zero_num() => eb,
                _ if eb.is_zero_num() => ea,
                _ => Expr::add_expr(ea, eb),
            }
        }

        ExprKind::Sub(a, b) => {
            let ea = simplify(a);
            let eb = simplify(b);
            match (&ea.kind, &eb.kind) {
                (ExprKind::Number(x), ExprKind::Number(y)) => Expr::number(x - y),
                _ if eb.is_zero_num() => ea,
                _ if ea.is_zero_num() => Expr::mul_expr(Expr::number(-1.0), eb),
                _ => Expr::sub_expr(ea, eb),
            }
        }

        ExprKind::Mul(a, b) => {
            let ea = simplify(a);
            let eb = simplify(b);
            match (&ea.kind, &eb.kind) {
                (ExprKind::Number(x), ExprKind::Number(y)) => Expr::number(x * y),
                _ if ea.is_zero_num() || eb.is_zero_num() => Expr::number(0.0),
                _ if ea.is_one_num() => eb,
                _ if eb.is_one_num() => ea,
                _ => Expr::mul_expr(ea, eb),
            }
        }

        ExprKind::Div(a, b) => {
            let ea = simplify(a);
            let eb = simplify(b);
            match (&ea.kind, &eb.kind) {
                // Numeric fold only when the divisor is provably nonzero
                (ExprKind::Number(x), ExprKind::Number(y)) if *y != 0.0 => Expr::number(x / y),
                _ if eb.is_one_num() => ea,
                _ => Expr::div_expr(ea, eb),
            }
        }

        ExprKind::Pow(a, b) => {
            let ea = simplify(a);
            let eb = simplify(b);
            match (&ea.kind, &eb.kind) {
                // Note: 0^0 evaluates to 1.0 following IEEE 754 powf behavior
                (ExprKind::Number(x), ExprKind::Number(y)) => Expr::number(x.powf(*y)),
                _ if eb.is_one_num() => ea,
                _ if eb.is_zero_num() => Expr::number(1.0),
                _ if ea.is_one_num() => Expr::number(1.0),
                _ => Expr::pow(ea, eb),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simp(e: &Expr) -> String {
        simplify(e).to_string()
    }

    #[test]
    fn test_numeric_folding() {
        let e = Expr::add_expr(Expr::number(1.0), Expr::number(2.0));
        assert_eq!(simp(&e), "3");

        let e = Expr::pow(Expr::number(2.0), Expr::number(3.0));
        assert_eq!(simp(&e), "8");
    }

    #[test]
    fn test_additive_identity() {
        let e = Expr::add_expr(
            Expr::mul_expr(Expr::number(2.0), Expr::symbol("x")),
            Expr::number(0.0),
        );
        assert_eq!(simp(&e), "2 * x");
    }

    #[test]
    fn test_negation_shape() {
        let e = Expr::sub_expr(Expr::number(0.0), Expr::symbol("x"));
        assert_eq!(simp(&e), "-x");
    }

    #[test]
    fn test_multiplicative_identities() {
        let e = Expr::mul_expr(Expr::symbol("x"), Expr::number(1.0));
        assert_eq!(simp(&e), "x");

        let e = Expr::mul_expr(Expr::number(0.0), Expr::func("sin", Expr::symbol("x")));
        assert_eq!(simp(&e), "0");
    }

    #[test]
    fn test_power_identities() {
        let e = Expr::pow(Expr::symbol("x"), Expr::number(1.0));
        assert_eq!(simp(&e), "x");

        let e = Expr::pow(Expr::symbol("x"), Expr::number(0.0));
        assert_eq!(simp(&e), "1");
    }

    #[test]
    fn test_division_by_zero_not_folded() {
        let e = Expr::div_expr(Expr::number(1.0), Expr::number(0.0));
        assert_eq!(simp(&e), "1 / 0");
    }

    #[test]
    fn test_function_calls_stay_symbolic() {
        let e = Expr::func("sin", Expr::number(1.0));
        assert_eq!(simp(&e), "sin(1)");

        // But their arguments are still cleaned up
        let e = Expr::func(
            "sin",
            Expr::add_expr(Expr::symbol("x"), Expr::number(0.0)),
        );
        assert_eq!(simp(&e), "sin(x)");
    }

    #[test]
    fn test_nested_cleanup() {
        // (x * 1) + (0 * y) + 2 * 3 -> x + 6
        let e = Expr::add_expr(
            Expr::add_expr(
                Expr::mul_expr(Expr::symbol("x"), Expr::number(1.0)),
                Expr::mul_expr(Expr::number(0.0), Expr::symbol("y")),
            ),
            Expr::mul_expr(Expr::number(2.0), Expr::number(3.0)),
        );
        assert_eq!(simp(&e), "x + 6");
    }
}
