use anyhow::Context;
use chrono::{DateTime, Local};
use gradviz::{
    render, render_pass,
    shell::{self, Command},
    EvalError, GradError, Gradient, ParseError, Point, DEFAULT_FORMULA, DOMAIN_MAX, DOMAIN_MIN,
    GRID_RESOLUTION,
};
#[cfg(not(debug_assertions))]
use std::process::Stdio;
use std::{
    fs::OpenOptions,
    io::{self, stdout, BufWriter, Write},
    process::{self, Child, ExitCode},
};

const EXPLANATION: &str = "\
The gradient vector points in the direction of the steepest ascent of the \
function. On the contour plot, the gradient arrow is perpendicular to the \
contour lines and indicates the direction in which the function increases \
most rapidly.";

fn output_filename(now: DateTime<Local>, kind: &str, ext: &str) -> String {
    format!(
        "{}_{kind}-{}.{ext}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S")
    )
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct State {
    formula: String,
    point: Point,
    gnuplot: Vec<Child>,
}

fn try_main() -> anyhow::Result<()> {
    let mut state = State {
        formula: String::from(DEFAULT_FORMULA),
        point: Point::default(),
        gnuplot: Vec::new(),
    };

    let mut stdout = BufWriter::new(stdout());
    loop {
        writeln!(stdout, "f(x, y) = {}", state.formula)?;
        writeln!(stdout, "point = {}", state.point)?;

        let mut try_cmd = shell::input(&mut stdout, "> ")?;
        try_cmd.make_ascii_lowercase();
        writeln!(stdout)?;

        if let Ok(cmd) = try_cmd.parse::<Command>() {
            match cmd {
                Command::Help => {
                    for c in Command::exhaustive() {
                        writeln!(stdout, "{name}: {help}", name = c.name(), help = c.help())?;
                    }
                }

                Command::Quit => break,

                Command::SetFormula => set_formula(&mut stdout, &mut state)?,

                Command::SetPoint => set_point(&mut stdout, &mut state)?,

                Command::Gradient => print_gradient(&mut stdout, &state)?,

                Command::Plot => plot(&mut stdout, &mut state)?,

                Command::Explain => writeln!(stdout, "{EXPLANATION}")?,
            }
        } else {
            writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
        }

        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn set_formula<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let input = shell::input(&mut out, "f(x, y) = ")?;
    if input.is_empty() {
        return Ok(());
    }

    // reject bad input without losing the current formula
    match gradviz::parse(&input) {
        Ok(_) => state.formula = input,
        Err(err) => {
            writeln!(out)?;
            report_parse_error(&mut out, &input, &err)?;
        }
    }
    Ok(())
}

fn set_point<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "point = {}", state.point)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;
    writeln!(
        out,
        "note: coordinates must lie in [{DOMAIN_MIN}, {DOMAIN_MAX}]"
    )?;

    let mut next = state.point;
    for (name, dst) in [("x0", &mut next.x), ("y0", &mut next.y)] {
        match shell::read_fromstr::<_, f64>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(new)) => *dst = new,
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    if next.in_domain() {
        state.point = next;
    } else {
        writeln!(out, "error: {next} is outside the plot window")?;
    }
    Ok(())
}

fn print_gradient<W: Write>(mut out: W, state: &State) -> anyhow::Result<()> {
    let expr = match gradviz::parse(&state.formula) {
        Ok(expr) => expr,
        Err(err) => {
            report_parse_error(&mut out, &state.formula, &err)?;
            return Ok(());
        }
    };
    let gradient = match Gradient::of(&expr) {
        Ok(gradient) => gradient,
        Err(err) => {
            report_eval_error(&mut out, &err)?;
            return Ok(());
        }
    };

    writeln!(out, "df/dx = {}", gradient.dx)?;
    writeln!(out, "df/dy = {}", gradient.dy)?;

    match gradient.evaluate_at(state.point.x, state.point.y) {
        Ok(v) => writeln!(
            out,
            "grad f{point} = ({gx:.3}, {gy:.3})",
            point = state.point,
            gx = v.x,
            gy = v.y
        )?,
        Err(err) => report_eval_error(&mut out, &err)?,
    }
    Ok(())
}

fn plot<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let vis = match render_pass(&state.formula, state.point) {
        Ok(vis) => vis,
        Err(GradError::Parse(err)) => {
            report_parse_error(&mut out, &state.formula, &err)?;
            return Ok(());
        }
        Err(GradError::Eval(err)) => {
            report_eval_error(&mut out, &err)?;
            return Ok(());
        }
    };

    writeln!(out, "df/dx = {}", vis.gradient.dx)?;
    writeln!(out, "df/dy = {}", vis.gradient.dy)?;
    writeln!(
        out,
        "grad f{point} = ({gx:.3}, {gy:.3})",
        point = vis.point,
        gx = vis.vector.x,
        gy = vis.vector.y
    )?;
    if vis.hole_count > 0 {
        writeln!(
            out,
            "note: {count} of {total} grid points are undefined and will be left blank",
            count = vis.hole_count,
            total = GRID_RESOLUTION * GRID_RESOLUTION
        )?;
    }

    // set up gnuplot
    for mut old_child in state.gnuplot.drain(..) {
        old_child
            .kill()
            .context("failed to kill previous gnuplot child")?;
    }
    let now = Local::now();
    let grid_path = output_filename(now, "grid", "data");
    let arrow_path = output_filename(now, "arrow", "data");
    let surface_script_path = output_filename(now, "surface", "gnuplot");
    let contour_script_path = output_filename(now, "contour", "gnuplot");
    let surface_svg_path = output_filename(now, "surface", "svg");
    let contour_svg_path = output_filename(now, "contour", "svg");

    let mut grid_file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&grid_path)
            .context("failed to open output grid data file")?,
    );
    render::write_grid_data(&mut grid_file, &vis.surface)?;
    grid_file.flush()?;
    grid_file.get_mut().sync_data()?;
    drop(grid_file);

    let mut arrow_file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&arrow_path)
            .context("failed to open output arrow data file")?,
    );
    render::write_arrow_data(&mut arrow_file, &vis.contour.arrow)?;
    arrow_file.flush()?;
    arrow_file.get_mut().sync_data()?;
    drop(arrow_file);

    let child = spawn_figure(&surface_script_path, |w| {
        render::write_surface_script(w, &vis.surface, &grid_path, &surface_svg_path)
    })?;
    state.gnuplot.push(child);

    let child = spawn_figure(&contour_script_path, |w| {
        render::write_contour_script(w, &vis.contour, &grid_path, &arrow_path, &contour_svg_path)
    })?;
    state.gnuplot.push(child);

    writeln!(out, "wrote {surface_svg_path} and {contour_svg_path}")?;
    Ok(())
}

fn spawn_figure(
    script_path: &str,
    write_script: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<Child> {
    let mut script = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(script_path)
            .context("failed to open output gnuplot file")?,
    );
    write_script(&mut script)?;
    script.flush()?;
    script.get_mut().sync_data()?;
    drop(script);

    // spawn gnuplot and provide the path to the file
    let mut cmd = process::Command::new("gnuplot");
    cmd.arg("--persist").arg(script_path);
    #[cfg(not(debug_assertions))]
    {
        cmd.stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null());
    }
    cmd.spawn()
        .context("failed to spawn gnuplot (is it installed and in ${PATH}?)")
}

fn report_parse_error<W: Write>(mut out: W, src: &str, err: &ParseError) -> io::Result<()> {
    shell::underline(&mut out, src, err.span())?;
    writeln!(out, "parse error: {err}")?;
    match err {
        ParseError::UnknownSymbol { name, .. } | ParseError::UnknownFunction { name, .. } => {
            if let Some((kind, known)) = shell::similar_name(name) {
                writeln!(out, "note: {kind} '{known}' has a similar name")?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn report_eval_error<W: Write>(mut out: W, err: &EvalError) -> io::Result<()> {
    writeln!(out, "evaluation error: {err}")?;
    if let EvalError::UnknownFunction { name } = err {
        if let Some((kind, known)) = shell::similar_name(name) {
            writeln!(out, "note: {kind} '{known}' has a similar name")?;
        }
    }
    Ok(())
}
