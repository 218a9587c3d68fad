//! Interactive shell plumbing: command words, prompts, and error underlining.

use crate::error::Span;
use crate::functions;
use anyhow::Context;
use core::fmt;
use std::io::{self, stdin, BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    SetFormula,
    SetPoint,
    Gradient,
    Plot,
    Explain,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::SetFormula,
            Self::SetPoint,
            Self::Gradient,
            Self::Plot,
            Self::Explain,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command",
            Self::Quit => "quit the shell",
            Self::SetFormula => "set the function f(x, y) to visualize",
            Self::SetPoint => "set the evaluation point (x0, y0)",
            Self::Gradient => "print the symbolic gradient and its value at the point",
            Self::Plot => "render the surface and contour figures of the current function",
            Self::Explain => "describe what the gradient arrow shows",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::SetFormula => "set",
            Self::SetPoint => "point",
            Self::Gradient => "gradient",
            Self::Plot => "plot",
            Self::Explain => "explain",
        }
    }
}

impl core::str::FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for c in Self::exhaustive() {
            if s == c.name() {
                return Ok(*c);
            }
        }
        Err(())
    }
}

pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<String> {
    fn inner<W: Write>(mut out: W, prompt: impl fmt::Display) -> io::Result<String> {
        write!(out, "{prompt}")?;
        out.flush()?;
        let mut stdin = stdin().lock();
        let mut s = String::new();
        stdin.read_line(&mut s)?;
        Ok(s.trim().to_string())
    }

    let s = inner(out, prompt).context("read from standard input failed")?;
    Ok(s)
}

pub fn read_fromstr<W: Write, T: core::str::FromStr>(
    mut out: W,
    prompt: impl fmt::Display,
    ignore_empty: bool,
) -> anyhow::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    let input = input(&mut out, prompt)?;
    if ignore_empty && input.is_empty() {
        return Ok(Ok(None));
    }
    match input.parse::<T>() {
        Ok(new) => Ok(Ok(Some(new))),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, &input, Some(Span::new(0, input.len())))?;
            writeln!(out, "parse error: {err}")?;
            Ok(Err(err))
        }
    }
}

/// Prints the source line with a caret run under the offending span.
///
/// Spans are byte offsets, so the caret drifts on non-ASCII input. Without
/// a usable span the caret points just past the end of the line.
pub fn underline<W: Write>(mut out: W, src: &str, span: Option<Span>) -> io::Result<()> {
    let (start, len) = match span {
        Some(s) if s.is_valid() => (s.start, s.end - s.start),
        _ => (src.len(), 1),
    };
    writeln!(out, "{src}")?;
    writeln!(out, "{}{}", " ".repeat(start), "^".repeat(len))?;
    Ok(())
}

/// Finds the known name most similar to a rejected one.
///
/// Returns the kind of the match and the match itself, or `None` when
/// nothing clears the similarity threshold.
pub fn similar_name(unknown: &str) -> Option<(&'static str, &'static str)> {
    let unknown = unknown.to_ascii_lowercase();
    let vars = [
        ("variable", "x"),
        ("variable", "y"),
        ("constant", "pi"),
        ("constant", "e"),
    ];
    functions::known_function_names()
        .into_iter()
        .map(|name| ("function", name))
        .chain(vars)
        .map(|(kind, name)| {
            (
                strsim::normalized_damerau_levenshtein(&unknown, &name.to_ascii_lowercase()),
                (kind, name),
            )
        })
        .reduce(|(acc_sim, acc_kn), (elem_sim, elem_kn)| {
            if elem_sim > acc_sim {
                (elem_sim, elem_kn)
            } else {
                (acc_sim, acc_kn)
            }
        })
        .and_then(|(sim, kn)| (sim > 0.3).then_some(kn))
}
