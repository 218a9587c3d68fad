//! Compiled expression evaluator for fast numerical evaluation.
//!
//! Converts an expression tree into flat bytecode that a small stack machine
//! executes without tree traversal. Compilation tracks the running stack
//! depth, so the required stack size is known, and bounded, before anything
//! executes.
//!
//! ```text
//! Expr (tree)  ->  Compiler (bytecode)  ->  CompiledEvaluator (stack machine)
//! ```
//!
//! # Example
//!
//! ```
//! use gradviz::{parse, CompiledEvaluator};
//!
//! let expr = parse("sin(x) * cos(x) + x^2").unwrap();
//! let eval = CompiledEvaluator::compile_auto(&expr).unwrap();
//!
//! // Evaluate at x = 0.5
//! let result = eval.evaluate(&[0.5]);
//! assert!((result - (0.5_f64.sin() * 0.5_f64.cos() + 0.25)).abs() < 1e-10);
//! ```

mod execution;

use crate::ast::{self, Expr, ExprKind};
use crate::error::EvalError;
use crate::functions;
use std::collections::HashMap;

/// Maximum evaluation stack depth accepted by the compiler.
///
/// Differentiation can deepen a tree well past what the parser admits, so
/// depth is checked again at compile time.
const MAX_STACK_DEPTH: usize = 1024;

/// Bytecode instruction for stack-based evaluation.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Instruction {
    /// Push a constant from the pool onto the stack (by index).
    LoadConst(u32),
    /// Push a parameter value onto the stack (by index).
    LoadParam(u32),

    // Arithmetic operations (pop operands, push result)
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Pow,

    /// Replace the top `argc` stack values with one function result.
    ///
    /// The evaluation pointer comes from the registry entry, so bytecode and
    /// tree walks share a single definition per function name.
    Call {
        eval: fn(&[f64]) -> Option<f64>,
        argc: u8,
    },
}

/// Compiled expression evaluator, thread-safe and reusable.
///
/// The evaluator holds immutable bytecode that can be shared freely. Each
/// call to [`evaluate`](CompiledEvaluator::evaluate) uses its own stack.
#[derive(Clone)]
pub struct CompiledEvaluator {
    /// Bytecode instructions (immutable after compilation)
    instructions: Box<[Instruction]>,
    /// Required stack depth for evaluation
    stack_size: usize,
    /// Parameter names in evaluation order
    param_names: Box<[String]>,
    /// Constant pool for numeric literals
    constants: Box<[f64]>,
}

impl CompiledEvaluator {
    /// Compile an expression to bytecode.
    ///
    /// `param_order` fixes the layout of the value slice later handed to
    /// [`evaluate`](CompiledEvaluator::evaluate). Every free variable of the
    /// expression must appear in it.
    ///
    /// # Errors
    ///
    /// * [`EvalError::UnboundVariable`] for a symbol that is neither a known
    ///   constant nor listed in `param_order`
    /// * [`EvalError::UnknownFunction`] for a function call without a
    ///   matching registry entry
    /// * [`EvalError::StackOverflow`] for expressions nested deeper than the
    ///   evaluation stack allows
    pub fn compile(expr: &Expr, param_order: &[&str]) -> Result<Self, EvalError> {
        let mut compiler = Compiler::new(param_order);
        compiler.compile_expr(expr)?;
        let (instructions, constants, max_stack) = compiler.into_parts();

        Ok(Self {
            instructions: instructions.into_boxed_slice(),
            stack_size: max_stack,
            param_names: param_order.iter().map(|s| (*s).to_string()).collect(),
            constants: constants.into_boxed_slice(),
        })
    }

    /// Compile an expression, determining parameter order from its variables.
    ///
    /// Variables are sorted alphabetically for consistent ordering, with
    /// known constants such as `pi` and `e` excluded.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if compilation fails.
    pub fn compile_auto(expr: &Expr) -> Result<Self, EvalError> {
        let vars = expr.variables();
        let mut param_order: Vec<String> = vars
            .into_iter()
            .filter(|v| !ast::is_known_constant(v))
            .collect();
        param_order.sort(); // Consistent ordering

        let param_refs: Vec<&str> = param_order.iter().map(String::as_str).collect();
        Self::compile(expr, &param_refs)
    }

    /// Get the required stack size for this expression.
    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// Get parameter names in evaluation order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Get the number of parameters expected by `evaluate`.
    pub fn param_count(&self) -> usize {
        self.param_names.len()
    }

    /// Get the number of bytecode instructions (for debugging).
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}

impl std::fmt::Debug for CompiledEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledEvaluator")
            .field("param_names", &self.param_names)
            .field("instruction_count", &self.instructions.len())
            .field("stack_size", &self.stack_size)
            .field("constant_count", &self.constants.len())
            .finish()
    }
}

/// Internal compiler state.
struct Compiler<'a> {
    instructions: Vec<Instruction>,
    constants: Vec<f64>,
    const_index: HashMap<u64, u32>,
    param_map: HashMap<&'a str, u32>,
    current_stack: usize,
    max_stack: usize,
}

impl<'a> Compiler<'a> {
    fn new(param_order: &[&'a str]) -> Self {
        let param_map: HashMap<&str, u32> = param_order
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i as u32))
            .collect();

        Self {
            instructions: Vec::with_capacity(16),
            constants: Vec::new(),
            const_index: HashMap::new(),
            param_map,
            current_stack: 0,
            max_stack: 0,
        }
    }

    fn push(&mut self) -> Result<(), EvalError> {
        self.current_stack += 1;
        if self.current_stack > MAX_STACK_DEPTH {
            return Err(EvalError::StackOverflow {
                depth: self.current_stack,
                limit: MAX_STACK_DEPTH,
            });
        }
        self.max_stack = self.max_stack.max(self.current_stack);
        Ok(())
    }

    fn pop(&mut self) {
        self.current_stack = self.current_stack.saturating_sub(1);
    }

    fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Emit a `LoadConst`, reusing the pool slot if the value is already there.
    ///
    /// Deduplication compares bit patterns, so `0.0` and `-0.0` keep separate
    /// slots.
    fn load_const(&mut self, value: f64) -> Result<(), EvalError> {
        let bits = value.to_bits();
        let idx = match self.const_index.get(&bits) {
            Some(&idx) => idx,
            None => {
                let idx = self.constants.len() as u32;
                self.constants.push(value);
                self.const_index.insert(bits, idx);
                idx
            }
        };
        self.emit(Instruction::LoadConst(idx));
        self.push()
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<(), EvalError> {
        match &expr.kind {
            ExprKind::Number(n) => self.load_const(*n)?,

            ExprKind::Symbol(name) => {
                if let Some(value) = ast::get_constant_value(name) {
                    self.load_const(value)?;
                } else if let Some(&idx) = self.param_map.get(name.as_str()) {
                    self.emit(Instruction::LoadParam(idx));
                    self.push()?;
                } else {
                    return Err(EvalError::UnboundVariable { name: name.clone() });
                }
            }

            ExprKind::Add(lhs, rhs) => {
                self.compile_expr(lhs)?;
                self.compile_expr(rhs)?;
                self.emit(Instruction::Add);
                self.pop();
            }

            ExprKind::Sub(lhs, rhs) => {
                self.compile_expr(lhs)?;
                self.compile_expr(rhs)?;
                self.emit(Instruction::Sub);
                self.pop();
            }

            ExprKind::Mul(lhs, rhs) => {
                // Negation pattern: Mul(-1, u) compiles to a single Neg
                if lhs.is_neg_one_num() {
                    self.compile_expr(rhs)?;
                    self.emit(Instruction::Neg);
                } else {
                    self.compile_expr(lhs)?;
                    self.compile_expr(rhs)?;
                    self.emit(Instruction::Mul);
                    self.pop();
                }
            }

            ExprKind::Div(lhs, rhs) => {
                self.compile_expr(lhs)?;
                self.compile_expr(rhs)?;
                self.emit(Instruction::Div);
                self.pop();
            }

            ExprKind::Pow(base, exp) => {
                self.compile_expr(base)?;
                self.compile_expr(exp)?;
                self.emit(Instruction::Pow);
                self.pop();
            }

            ExprKind::FunctionCall { name, args } => {
                let def = functions::lookup(name)
                    .ok_or_else(|| EvalError::UnknownFunction { name: name.clone() })?;
                // Arity mismatches only arise in hand-built trees; the parser
                // rejects them before a tree exists.
                if !def.validate_arity(args.len()) {
                    return Err(EvalError::UnknownFunction { name: name.clone() });
                }

                for arg in args {
                    self.compile_expr(arg)?;
                }
                self.emit(Instruction::Call {
                    eval: def.eval,
                    argc: args.len() as u8,
                });
                for _ in 0..args.len() {
                    self.pop();
                }
                self.push()?;
            }
        }
        Ok(())
    }

    fn into_parts(self) -> (Vec<Instruction>, Vec<f64>, usize) {
        (self.instructions, self.constants, self.max_stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn compile_auto_sorts_parameters_alphabetically() {
        let expr = parse("y + x").unwrap();
        let eval = CompiledEvaluator::compile_auto(&expr).unwrap();
        assert_eq!(eval.param_names(), ["x", "y"]);
    }

    #[test]
    fn known_constants_are_not_parameters() {
        let expr = parse("pi * e").unwrap();
        let eval = CompiledEvaluator::compile_auto(&expr).unwrap();
        assert_eq!(eval.param_count(), 0);

        let value = eval.evaluate(&[]);
        let expected = std::f64::consts::PI * std::f64::consts::E;
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn constant_pool_is_deduplicated() {
        let expr = parse("2 * x + 2").unwrap();
        let eval = CompiledEvaluator::compile_auto(&expr).unwrap();
        assert_eq!(eval.constants.len(), 1);
    }

    #[test]
    fn unbound_variable_is_rejected() {
        let expr = parse("x + y").unwrap();
        let err = CompiledEvaluator::compile(&expr, &["x"]).unwrap_err();
        assert!(matches!(err, EvalError::UnboundVariable { name } if name == "y"));
    }

    #[test]
    fn unknown_function_is_rejected() {
        let expr = Expr::func("frobnicate", Expr::symbol("x"));
        let err = CompiledEvaluator::compile(&expr, &["x"]).unwrap_err();
        assert!(matches!(err, EvalError::UnknownFunction { name } if name == "frobnicate"));
    }

    #[test]
    fn wrong_arity_in_hand_built_tree_is_rejected() {
        let expr = Expr::func_multi("sin", vec![Expr::symbol("x"), Expr::symbol("y")]);
        let err = CompiledEvaluator::compile(&expr, &["x", "y"]).unwrap_err();
        assert!(matches!(err, EvalError::UnknownFunction { name } if name == "sin"));
    }

    #[test]
    fn rejects_expressions_deeper_than_the_stack_limit() {
        let mut expr = Expr::number(1.0);
        for _ in 0..1100 {
            expr = Expr::add_expr(Expr::number(1.0), expr);
        }
        let err = CompiledEvaluator::compile_auto(&expr).unwrap_err();
        assert!(matches!(err, EvalError::StackOverflow { .. }));
    }
}
