//! Gnuplot script and data emission.
//!
//! The renderer writes plain gnuplot input: one data file holding the
//! sampled grid, one holding the arrow segment, and a script that draws
//! the surface figure and the contour figure into SVG files. Everything
//! here writes into a generic sink, so the binary decides the paths and
//! the tests read the output back as text.
//!
//! Undefined grid nodes are written as `NaN` and declared missing to
//! gnuplot, which leaves gaps in the surface instead of dragging it to a
//! fake height.

use std::io::{self, Write};

use crate::plot::{Arrow, ContourPlot, SurfacePlot};
use crate::{DOMAIN_MAX, DOMAIN_MIN};

/// Output resolution of the rendered SVG files.
pub const OUTPUT_RES: [u32; 2] = [1920, 1080];

/// Number of contour levels between the sampled minimum and maximum.
const CONTOUR_LEVELS: u32 = 10;

/// Writes the sampled grid as whitespace-separated `x y z` rows.
///
/// Rows of constant y form blocks separated by blank lines, which is the
/// layout gnuplot expects for gridded `splot` input.
pub fn write_grid_data<W: Write>(mut out: W, surface: &SurfacePlot) -> io::Result<()> {
    for ((xs, ys), zs) in surface.x.iter().zip(&surface.y).zip(&surface.z) {
        for ((x, y), z) in xs.iter().zip(ys).zip(zs) {
            writeln!(out, "{x} {y} {z}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the arrow segment as two `x y` rows, start then tip.
pub fn write_arrow_data<W: Write>(mut out: W, arrow: &Arrow) -> io::Result<()> {
    writeln!(out, "{} {}", arrow.start.0, arrow.start.1)?;
    writeln!(out, "{} {}", arrow.end.0, arrow.end.1)?;
    Ok(())
}

/// Writes the gnuplot script for the 3D surface figure.
pub fn write_surface_script<W: Write>(
    mut out: W,
    surface: &SurfacePlot,
    grid_path: &str,
    svg_path: &str,
) -> io::Result<()> {
    writeln!(out, "reset")?;
    writeln!(out, "set term push")?;

    // set output info
    let [width, height] = OUTPUT_RES;
    writeln!(out, "set terminal svg size {width},{height} enhanced")?;
    writeln!(out, "set output '{svg_path}'")?;

    // set window
    writeln!(out, "set xrange[{DOMAIN_MIN}:{DOMAIN_MAX}]")?;
    writeln!(out, "set yrange[{DOMAIN_MIN}:{DOMAIN_MAX}]")?;

    // configure appearance
    writeln!(out, r#"set title "{title}""#, title = surface.title)?;
    writeln!(out, "set title noenhanced")?;
    writeln!(out, r#"set xlabel "{label}""#, label = surface.x_label)?;
    writeln!(out, r#"set ylabel "{label}""#, label = surface.y_label)?;
    writeln!(out, r#"set zlabel "{label}""#, label = surface.z_label)?;
    writeln!(out, "set tics out nomirror")?;
    writeln!(out, r#"set datafile missing "NaN""#)?;
    if !surface.show_scale {
        writeln!(out, "unset colorbox")?;
    }
    writeln!(out, "set pm3d depthorder")?;

    // plot svg
    writeln!(out, "splot '{grid_path}' using 1:2:3 with pm3d notitle")?;

    // display window
    writeln!(out, "set term pop")?;
    writeln!(out, "replot")?;
    Ok(())
}

/// Writes the gnuplot script for the contour figure with the arrow overlay.
///
/// The contour levels are spaced evenly across the sampled height range.
/// When no finite range exists the level selection is left to gnuplot.
pub fn write_contour_script<W: Write>(
    mut out: W,
    contour: &ContourPlot,
    grid_path: &str,
    arrow_path: &str,
    svg_path: &str,
) -> io::Result<()> {
    writeln!(out, "reset")?;
    writeln!(out, "set term push")?;

    // set output info
    let [width, height] = OUTPUT_RES;
    writeln!(out, "set terminal svg size {width},{height} enhanced")?;
    writeln!(out, "set output '{svg_path}'")?;

    // set window
    writeln!(out, "set xrange[{DOMAIN_MIN}:{DOMAIN_MAX}]")?;
    writeln!(out, "set yrange[{DOMAIN_MIN}:{DOMAIN_MAX}]")?;

    // configure appearance
    writeln!(out, r#"set title "{title}""#, title = contour.title)?;
    writeln!(out, "set title noenhanced")?;
    writeln!(out, r#"set xlabel "{label}""#, label = contour.x_label)?;
    writeln!(out, r#"set ylabel "{label}""#, label = contour.y_label)?;
    writeln!(out, "set tics out nomirror")?;
    writeln!(out, r#"set datafile missing "NaN""#)?;

    // flatten to contour lines only
    writeln!(out, "set view map")?;
    writeln!(out, "unset surface")?;
    writeln!(out, "set contour base")?;
    match contour.z_range {
        Some((min, max)) if max > min => {
            let step = (max - min) / f64::from(CONTOUR_LEVELS);
            writeln!(out, "set cntrparam levels incremental {min},{step},{max}")?;
        }
        _ => writeln!(out, "set cntrparam levels auto {CONTOUR_LEVELS}")?,
    }

    writeln!(out, "set key out vertical top right")?;

    // plot svg
    writeln!(
        out,
        r#"splot '{grid_path}' using 1:2:3 with lines lw {width} notitle, \"#,
        width = contour.line_width,
    )?;
    writeln!(
        out,
        r#"  '{arrow_path}' using 1:2:(0) with linespoints lw {width} pt 7 title "{name}" noenhance"#,
        width = contour.arrow.line_width,
        name = contour.arrow.name,
    )?;

    // display window
    writeln!(out, "set term pop")?;
    writeln!(out, "replot")?;
    Ok(())
}
