//! Symbolic gradient computation and point evaluation.
//!
//! The gradient of `f(x, y)` is kept in two forms: the pair of
//! partial-derivative expressions (for display) and the pair of real numbers
//! obtained by evaluating them at a point (for the arrow overlay).

use crate::ast::Expr;
use crate::error::EvalError;
use crate::evaluator::CompiledEvaluator;

/// The pair of first partial derivatives of `f(x, y)`, kept symbolic.
///
/// Both partials go through the simplification pass so the readout stays
/// short: `d/dx (x^2 + y^2)` prints as `2 * x`, not `2 * x^1 + 0`.
///
/// # Example
///
/// ```
/// use gradviz::{parse, Gradient};
///
/// let expr = parse("x^2 + y^2").unwrap();
/// let grad = Gradient::of(&expr).unwrap();
/// assert_eq!(grad.dx.to_string(), "2 * x");
/// assert_eq!(grad.dy.to_string(), "2 * y");
/// ```
#[derive(Debug, Clone)]
pub struct Gradient {
    /// Partial derivative with respect to `x`
    pub dx: Expr,
    /// Partial derivative with respect to `y`
    pub dy: Expr,
}

impl Gradient {
    /// Differentiate `expr` with respect to `x` and `y`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownFunction`] if the tree contains a function
    /// call without a registry entry (possible only for hand-built trees).
    pub fn of(expr: &Expr) -> Result<Self, EvalError> {
        Ok(Self {
            dx: expr.diff("x")?.simplified(),
            dy: expr.diff("y")?.simplified(),
        })
    }

    /// Evaluate both partials at `(x, y)`.
    ///
    /// Both components must come out finite. A division by zero or a domain
    /// violation at the point aborts the run with [`EvalError::NotFinite`]
    /// naming the offending component.
    pub fn evaluate_at(&self, x: f64, y: f64) -> Result<GradientVector, EvalError> {
        // Fixed parameter order keeps the value slice layout independent of
        // which variables actually survive differentiation.
        let dx = CompiledEvaluator::compile(&self.dx, &["x", "y"])?;
        let dy = CompiledEvaluator::compile(&self.dy, &["x", "y"])?;

        let gx = dx.evaluate(&[x, y]);
        let gy = dy.evaluate(&[x, y]);

        if !gx.is_finite() {
            return Err(EvalError::NotFinite {
                what: "df/dx".to_string(),
                x,
                y,
            });
        }
        if !gy.is_finite() {
            return Err(EvalError::NotFinite {
                what: "df/dy".to_string(),
                x,
                y,
            });
        }

        Ok(GradientVector { x: gx, y: gy })
    }
}

/// Numeric gradient at a specific point.
///
/// Points in the direction of steepest ascent of `f` from that point. Both
/// components are guaranteed finite by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientVector {
    pub x: f64,
    pub y: f64,
}
