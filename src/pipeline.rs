//! One full render pass, from formula text to plot payloads.
//!
//! The stages run strictly forward: parse, differentiate, evaluate at the
//! point, sample the grid, shape the payloads. The first failing stage
//! aborts the pass and nothing after it runs, so a caller never sees a
//! half-built [`Visualization`].

use crate::ast::Expr;
use crate::error::GradError;
use crate::gradient::{Gradient, GradientVector};
use crate::grid::SampleGrid;
use crate::parser::parse;
use crate::plot::{ContourPlot, SurfacePlot};
use crate::Point;

/// Everything one successful pass produces.
#[derive(Debug, Clone)]
pub struct Visualization {
    /// The parsed function.
    pub expr: Expr,
    /// Both symbolic partials, simplified for display.
    pub gradient: Gradient,
    /// The gradient evaluated at the requested point.
    pub vector: GradientVector,
    /// The evaluation point the arrow starts from.
    pub point: Point,
    /// Grid nodes that came out undefined and will render as gaps.
    pub hole_count: usize,
    pub surface: SurfacePlot,
    pub contour: ContourPlot,
}

/// Runs the whole pipeline for one formula and point.
///
/// A single undefined value at the point itself is an error, while
/// undefined values on the sampling grid are tolerated and only counted.
/// The point is where the arrow is anchored, so there is nothing sensible
/// to draw when the gradient has no value there.
///
/// # Errors
///
/// [`GradError::Parse`] when the formula text is rejected, and
/// [`GradError::Eval`] when differentiation meets an unknown function or
/// the gradient is undefined at the point.
///
/// # Examples
///
/// ```
/// use gradviz::{render_pass, Point};
///
/// let vis = render_pass("x^2 + y^2", Point::new(1.0, 1.0))?;
/// assert_eq!((vis.vector.x, vis.vector.y), (2.0, 2.0));
/// assert_eq!(vis.hole_count, 0);
/// # Ok::<(), gradviz::GradError>(())
/// ```
pub fn render_pass(formula: &str, point: Point) -> Result<Visualization, GradError> {
    let expr = parse(formula)?;
    let gradient = Gradient::of(&expr)?;
    let vector = gradient.evaluate_at(point.x, point.y)?;
    let grid = SampleGrid::sample(&expr)?;

    let surface = SurfacePlot::from_grid(&grid);
    let contour = ContourPlot::new(&grid, point, vector);

    Ok(Visualization {
        expr,
        gradient,
        vector,
        point,
        hole_count: grid.hole_count(),
        surface,
        contour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, ParseError};
    use crate::GRID_RESOLUTION;

    #[test]
    fn default_formula_and_point_render() {
        let vis = render_pass("x^2 + y^2", Point::default()).unwrap();

        assert_eq!((vis.vector.x, vis.vector.y), (2.0, 2.0));
        assert_eq!(vis.hole_count, 0);
        assert_eq!(vis.surface.title, "3D Surface Plot of f(x, y)");
        assert_eq!(vis.contour.title, "Contour Plot with Gradient Direction");
        assert_eq!(vis.contour.arrow.start, (1.0, 1.0));
        assert_eq!(vis.contour.arrow.end, (2.6, 2.6));
    }

    #[test]
    fn malformed_formula_fails_at_the_parse_stage() {
        let err = render_pass("x^2 +", Point::default()).unwrap_err();

        assert!(matches!(err, GradError::Parse(_)));
    }

    #[test]
    fn stray_variable_fails_at_the_parse_stage() {
        let err = render_pass("x + z", Point::default()).unwrap_err();

        match err {
            GradError::Parse(ParseError::UnknownSymbol { name, .. }) => assert_eq!(name, "z"),
            other => panic!("expected an unknown symbol error, got {other:?}"),
        }
    }

    #[test]
    fn pole_at_the_point_aborts_the_pass() {
        let err = render_pass("1 / x", Point::new(0.0, 0.0)).unwrap_err();

        match err {
            GradError::Eval(EvalError::NotFinite { what, .. }) => assert_eq!(what, "df/dx"),
            other => panic!("expected a non-finite gradient error, got {other:?}"),
        }
    }

    #[test]
    fn grid_holes_are_counted_but_not_fatal() {
        // ln is undefined on half the domain, yet (1, 1) is fine.
        let vis = render_pass("ln(x)", Point::new(1.0, 1.0)).unwrap();

        assert_eq!(vis.hole_count, 25 * GRID_RESOLUTION);
        assert_eq!((vis.vector.x, vis.vector.y), (1.0, 0.0));
    }

    #[test]
    fn gradient_readout_is_simplified() {
        let vis = render_pass("x^2 * y", Point::new(2.0, 3.0)).unwrap();

        assert_eq!(vis.gradient.dx.to_string(), "2 * x * y");
        assert_eq!((vis.vector.x, vis.vector.y), (12.0, 4.0));
    }
}
