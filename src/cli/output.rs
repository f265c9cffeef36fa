//! User-facing output for the veridiff CLI.
//!
//! Centralizes verdict printing and diagnostic rendering so every subcommand
//! reports the same way: a colored PASS/FAIL line on stdout, and for
//! failures a full miette report on stderr.

use std::io::Write;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::VerifyError;

/// Picks a color choice based on whether the stream is a terminal.
pub fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints a green `PASS` verdict for the given comparison.
pub fn print_pass(label: &str) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "PASS");
    let _ = stdout.reset();
    let _ = writeln!(stdout, ": {label}");
}

/// Prints a red `FAIL` verdict and renders the error as a miette report.
pub fn print_fail(label: &str, error: VerifyError) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stdout, "FAIL");
    let _ = stdout.reset();
    let _ = writeln!(stdout, ": {label}");

    let report = Report::new(error);
    eprintln!("{report:?}");
}
