//! Fixed-domain function sampling for the surface and contour plots.
//!
//! The sampler builds the meshgrid coordinate arrays once per run and
//! evaluates the compiled expression at every node with a reused stack
//! buffer. Undefined nodes become NaN holes; only their count is reported.

use crate::ast::Expr;
use crate::error::EvalError;
use crate::evaluator::CompiledEvaluator;
use crate::{DOMAIN_MAX, DOMAIN_MIN, GRID_RESOLUTION};

/// Evenly spaced samples over `[start, stop]`, both endpoints included.
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let step = (stop - start) / (count - 1) as f64;
    let mut samples: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
    if let Some(last) = samples.last_mut() {
        *last = stop; // keep the endpoint exact
    }
    samples
}

/// Meshgrid samples of `f` over the fixed plot domain.
///
/// `x`, `y` and `z` always share the same shape. Rows follow the y axis and
/// columns the x axis, so `z[i][j] = f(x_axis[j], y_axis[i])`.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    z: Vec<Vec<f64>>,
    holes: usize,
}

impl SampleGrid {
    /// Sample `expr` on the fixed `GRID_RESOLUTION`² meshgrid.
    ///
    /// Nodes where the expression comes out NaN or infinite are stored as
    /// NaN and counted; they never abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] only if the expression fails to compile to
    /// bytecode.
    pub fn sample(expr: &Expr) -> Result<Self, EvalError> {
        let eval = CompiledEvaluator::compile(expr, &["x", "y"])?;
        let axis = linspace(DOMAIN_MIN, DOMAIN_MAX, GRID_RESOLUTION);

        let mut x = Vec::with_capacity(GRID_RESOLUTION);
        let mut y = Vec::with_capacity(GRID_RESOLUTION);
        let mut z = Vec::with_capacity(GRID_RESOLUTION);
        let mut holes = 0;

        let mut stack = Vec::with_capacity(eval.stack_size());
        for &yv in &axis {
            let mut row = Vec::with_capacity(GRID_RESOLUTION);
            for &xv in &axis {
                let value = eval.evaluate_with_stack(&[xv, yv], &mut stack);
                if value.is_finite() {
                    row.push(value);
                } else {
                    row.push(f64::NAN);
                    holes += 1;
                }
            }
            x.push(axis.clone());
            y.push(vec![yv; GRID_RESOLUTION]);
            z.push(row);
        }

        Ok(Self { x, y, z, holes })
    }

    /// X coordinates, one row per y sample.
    pub fn x(&self) -> &[Vec<f64>] {
        &self.x
    }

    /// Y coordinates, one row per y sample.
    pub fn y(&self) -> &[Vec<f64>] {
        &self.y
    }

    /// Sampled function values; NaN marks an undefined node.
    pub fn z(&self) -> &[Vec<f64>] {
        &self.z
    }

    /// Number of grid nodes where the function was undefined.
    pub fn hole_count(&self) -> usize {
        self.holes
    }

    /// The distinct x values (the first meshgrid row).
    pub fn x_axis(&self) -> &[f64] {
        &self.x[0]
    }

    /// The distinct y values (the first meshgrid column).
    pub fn y_axis(&self) -> Vec<f64> {
        self.y.iter().map(|row| row[0]).collect()
    }

    /// Smallest and largest finite sample, or `None` when every node is a
    /// hole.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &self.z {
            for &v in row {
                if v.is_finite() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
        (min <= max).then_some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn grid(formula: &str) -> SampleGrid {
        SampleGrid::sample(&parse(formula).unwrap()).unwrap()
    }

    #[test]
    fn all_three_arrays_share_the_fixed_shape() {
        let g = grid("x^2 + y^2");
        for arr in [g.x(), g.y(), g.z()] {
            assert_eq!(arr.len(), GRID_RESOLUTION);
            for row in arr {
                assert_eq!(row.len(), GRID_RESOLUTION);
            }
        }
    }

    #[test]
    fn axes_span_the_domain_endpoints() {
        let g = grid("x + y");
        assert_eq!(g.x_axis()[0], DOMAIN_MIN);
        assert_eq!(g.x_axis()[GRID_RESOLUTION - 1], DOMAIN_MAX);
        let y_axis = g.y_axis();
        assert_eq!(y_axis[0], DOMAIN_MIN);
        assert_eq!(y_axis[GRID_RESOLUTION - 1], DOMAIN_MAX);
    }

    #[test]
    fn meshgrid_rows_follow_y_and_columns_follow_x() {
        let g = grid("x + y");
        assert_eq!(g.x()[3][7], g.x_axis()[7]);
        assert_eq!(g.y()[3][7], g.y_axis()[3]);
    }

    #[test]
    fn paraboloid_samples_match_the_coordinates() {
        let g = grid("x^2 + y^2");
        for i in 0..GRID_RESOLUTION {
            for j in 0..GRID_RESOLUTION {
                let expected = g.x()[i][j] * g.x()[i][j] + g.y()[i][j] * g.y()[i][j];
                assert!((g.z()[i][j] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn smooth_function_has_no_holes() {
        assert_eq!(grid("x^2 + y^2").hole_count(), 0);
    }

    #[test]
    fn log_of_x_leaves_holes_on_the_negative_half() {
        // 25 of the 50 x samples are negative; the axis never hits zero.
        let g = grid("ln(x)");
        assert_eq!(g.hole_count(), 25 * GRID_RESOLUTION);
        assert!(g.z()[0][0].is_nan());
        assert!(g.z()[0][GRID_RESOLUTION - 1].is_finite());
    }

    #[test]
    fn z_range_skips_holes() {
        let g = grid("ln(x)");
        let (min, max) = g.z_range().unwrap();
        assert!(min.is_finite() && max.is_finite());
        assert!((max - 5.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn everywhere_undefined_function_has_no_range() {
        let g = grid("ln(-(1 + x^2))");
        assert_eq!(g.hole_count(), GRID_RESOLUTION * GRID_RESOLUTION);
        assert_eq!(g.z_range(), None);
    }
}
