//! Plot payload construction.
//!
//! Pure data shaping. The pipeline hands these structures to the renderer
//! unchanged, so everything a figure needs (titles, axis labels, line
//! widths, the arrow geometry) is carried here rather than hard-coded at
//! the drawing site. The only arithmetic in this module is the arrow
//! endpoint.

use crate::gradient::GradientVector;
use crate::grid::SampleGrid;
use crate::{Point, ARROW_SCALE};

/// Title of the 3D surface figure.
pub const SURFACE_TITLE: &str = "3D Surface Plot of f(x, y)";

/// Title of the contour figure.
pub const CONTOUR_TITLE: &str = "Contour Plot with Gradient Direction";

/// Legend entry for the arrow overlay.
pub const ARROW_NAME: &str = "Gradient Direction";

/// 3D surface description: one height per meshgrid node.
#[derive(Debug, Clone)]
pub struct SurfacePlot {
    pub title: &'static str,
    /// Meshgrid x coordinates, row by row.
    pub x: Vec<Vec<f64>>,
    /// Meshgrid y coordinates, row by row.
    pub y: Vec<Vec<f64>>,
    /// Sampled heights. Undefined nodes hold NaN and render as gaps.
    pub z: Vec<Vec<f64>>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub z_label: &'static str,
    /// Whether to draw a color scale next to the surface.
    pub show_scale: bool,
}

impl SurfacePlot {
    /// Packages a sampled grid as a surface figure.
    pub fn from_grid(grid: &SampleGrid) -> Self {
        Self {
            title: SURFACE_TITLE,
            x: grid.x().to_vec(),
            y: grid.y().to_vec(),
            z: grid.z().to_vec(),
            x_label: "x",
            y_label: "y",
            z_label: "f(x, y)",
            show_scale: false,
        }
    }
}

/// 2D contour description with the steepest-ascent arrow overlaid.
///
/// Unlike [`SurfacePlot`], the contour trace takes plain axis vectors
/// instead of full coordinate matrices. The z matrix is shared with the
/// surface figure and keeps the same row-follows-y orientation.
#[derive(Debug, Clone)]
pub struct ContourPlot {
    pub title: &'static str,
    /// The x axis, one value per column of z.
    pub x: Vec<f64>,
    /// The y axis, one value per row of z.
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
    /// Finite height range, `None` when every node is undefined.
    pub z_range: Option<(f64, f64)>,
    /// Width of the contour lines.
    pub line_width: f64,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub arrow: Arrow,
}

impl ContourPlot {
    /// Packages a sampled grid and a gradient vector as a contour figure.
    pub fn new(grid: &SampleGrid, point: Point, vector: GradientVector) -> Self {
        Self {
            title: CONTOUR_TITLE,
            x: grid.x_axis().to_vec(),
            y: grid.y_axis(),
            z: grid.z().to_vec(),
            z_range: grid.z_range(),
            line_width: 2.0,
            x_label: "x",
            y_label: "y",
            arrow: Arrow::from_gradient(point, vector),
        }
    }
}

/// Arrow from the evaluation point along the gradient direction.
///
/// The tip sits at `(x0 + s * gx, y0 + s * gy)` where `s` is the fixed
/// [`ARROW_SCALE`]. The arrow is not normalised: a steep gradient draws a
/// long arrow, a shallow one stays short, and a zero gradient degenerates
/// to a point at `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// Legend entry, [`ARROW_NAME`].
    pub name: &'static str,
    /// Width of the arrow shaft, heavier than the contour lines.
    pub line_width: f64,
}

impl Arrow {
    pub fn from_gradient(point: Point, vector: GradientVector) -> Self {
        Self {
            start: (point.x, point.y),
            end: (
                point.x + ARROW_SCALE * vector.x,
                point.y + ARROW_SCALE * vector.y,
            ),
            name: ARROW_NAME,
            line_width: 3.0,
        }
    }
}
