//! Report formatting for the command line.
//!
//! Writers are generic over `WriteColor` so the exact text can be checked
//! against an uncoloured buffer; colour is only ever added around the text,
//! never inside it.

use crate::index::{IndexUpdate, Staleness, UpdateAction};
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// When to colour stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a concrete choice; `Auto` colours only a terminal stdout
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}

/// Open stdout with the given colour mode
pub fn stdout(mode: ColorMode) -> StandardStream {
    StandardStream::stdout(mode.choice())
}

/// Print the missing-header report, or the all-clear line if nothing is missing
pub fn write_missing_report<W: WriteColor>(out: &mut W, missing: &[String]) -> io::Result<()> {
    if missing.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "All files have ABOUTME headers.")?;
        return out.reset();
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "Files missing ABOUTME headers ({}):", missing.len())?;
    out.reset()?;
    writeln!(out)?;

    for path in missing {
        writeln!(out, "  {}", path)?;
    }
    Ok(())
}

/// Print the result of a staleness check
pub fn write_staleness<W: WriteColor>(out: &mut W, status: &Staleness) -> io::Result<()> {
    let color = if status.stale { Color::Yellow } else { Color::Green };
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    writeln!(out, "{}", status.message)?;
    out.reset()
}

/// Print an `updated: <key>` / `removed: <key>` line
pub fn write_update<W: WriteColor>(out: &mut W, update: &IndexUpdate) -> io::Result<()> {
    let color = match update.action {
        UpdateAction::Updated => Color::Green,
        UpdateAction::Removed => Color::Red,
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{}", update.action)?;
    out.reset()?;
    writeln!(out, ": {}", update.key)
}

/// Print the confirmation after writing an index file
pub fn write_saved<W: Write>(out: &mut W, output: &str, count: usize) -> io::Result<()> {
    writeln!(out, "Index written to {} ({} files)", output, count)
}
