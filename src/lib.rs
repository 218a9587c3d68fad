//! Interactive gradient visualization for functions of two variables.
//!
//! Takes a formula f(x, y) as text, computes both partial derivatives
//! symbolically, evaluates the gradient at a chosen point, and samples the
//! function on a fixed grid. The results are shaped into two figure
//! payloads: a 3D surface plot and a contour plot with the direction of
//! steepest ascent drawn as an arrow.
//!
//! # Usage
//!
//! ```
//! use gradviz::{render_pass, Point};
//!
//! let vis = render_pass("x^2 + y^2", Point::new(1.0, 1.0))?;
//! assert_eq!(vis.gradient.dx.to_string(), "2 * x");
//! assert_eq!((vis.vector.x, vis.vector.y), (2.0, 2.0));
//! # Ok::<(), gradviz::GradError>(())
//! ```

use core::fmt;

mod ast;
mod differentiation;
mod display;
mod error;
mod evaluator;
pub mod functions;
mod gradient;
mod grid;
mod parser;
mod pipeline;
mod plot;
pub mod render;
pub mod shell;
mod simplification;

#[cfg(test)]
mod tests;

pub use ast::{Expr, ExprKind};
pub use error::{EvalError, GradError, ParseError, Span};
pub use evaluator::CompiledEvaluator;
pub use gradient::{Gradient, GradientVector};
pub use grid::SampleGrid;
pub use parser::parse;
pub use pipeline::{render_pass, Visualization};
pub use plot::{Arrow, ContourPlot, SurfacePlot, ARROW_NAME, CONTOUR_TITLE, SURFACE_TITLE};

/// Lower bound of the plot domain on both axes.
pub const DOMAIN_MIN: f64 = -5.0;
/// Upper bound of the plot domain on both axes.
pub const DOMAIN_MAX: f64 = 5.0;
/// Samples per axis of the fixed evaluation grid.
pub const GRID_RESOLUTION: usize = 50;
/// Factor applied to the gradient vector when drawing the arrow.
pub const ARROW_SCALE: f64 = 0.8;

/// Formula the shell starts with.
pub const DEFAULT_FORMULA: &str = "x^2 + y^2";
/// Evaluation point the shell starts with.
pub const DEFAULT_POINT: (f64, f64) = (1.0, 1.0);

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// The evaluation point (x0, y0) the gradient arrow is anchored at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie inside the plot domain.
    pub fn in_domain(&self) -> bool {
        let domain = DOMAIN_MIN..=DOMAIN_MAX;
        domain.contains(&self.x) && domain.contains(&self.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        let (x, y) = DEFAULT_POINT;
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
