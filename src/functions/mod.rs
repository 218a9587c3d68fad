//! Centralized mathematical function registry
//!
//! This module provides a single source of truth for all mathematical functions,
//! including their derivative formulas.

use crate::ast::{Expr, ExprKind};

pub(crate) mod definitions;
pub(crate) mod registry;

pub(crate) use registry::{FunctionDefinition, Registry};

/// Look up a function definition by name
pub(crate) fn lookup(name: &str) -> Option<&'static FunctionDefinition> {
    Registry::get(name)
}

/// Check whether a name refers to a registered function
pub fn is_known_function(name: &str) -> bool {
    Registry::get(name).is_some()
}

/// All registered function names in alphabetical order
pub fn known_function_names() -> Vec<&'static str> {
    Registry::names()
}

// ===== Helper functions for building derivative expressions =====

/// Create a function call expression from Expr
pub(crate) fn func(name: &str, arg: Expr) -> Expr {
    Expr::func(name, arg)
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), _) if *x == 0.0 => Expr::number(0.0),
        (_, ExprKind::Number(x)) if *x == 0.0 => Expr::number(0.0),
        (ExprKind::Number(x), _) if *x == 1.0 => b,
        (_, ExprKind::Number(x)) if *x == 1.0 => a,
        _ => Expr::mul_expr(a, b),
    }
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    Expr::mul_expr(Expr::number(-1.0), e)
}
