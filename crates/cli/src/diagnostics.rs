// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stderr diagnostics for a finished run.
//!
//! Errors raised after the run ended print as `Error: <message>`; abandoned
//! callbacks and interceptor faults print as warnings. Lines are coloured only
//! when stderr is a terminal.

use std::fmt;
use std::io::{self, IsTerminal, Write};

use crate::outcome::RunOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warning => "\x1b[33m",
        }
    }
}

/// One line of run diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Error raised after the run ended
    AfterEnd(String),
    /// Callbacks still scheduled at the drain deadline
    Abandoned(usize),
    /// Errors the interceptor could not hand over
    InterceptorFaults(u64),
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::AfterEnd(_) => Level::Error,
            Diagnostic::Abandoned(_) | Diagnostic::InterceptorFaults(_) => Level::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AfterEnd(message) => f.write_str(message),
            Diagnostic::Abandoned(count) => write!(
                f,
                "{count} callback(s) still scheduled after the drain deadline were abandoned"
            ),
            Diagnostic::InterceptorFaults(count) => write!(
                f,
                "error interception failed {count} time(s); results may be incomplete"
            ),
        }
    }
}

/// Diagnostics for `outcome`, after-end errors first in the order raised.
pub fn collect(outcome: &RunOutcome) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<_> = outcome
        .uncaught_after_end
        .iter()
        .map(|err| Diagnostic::AfterEnd(err.message.clone()))
        .collect();
    if outcome.abandoned_callbacks > 0 {
        diagnostics.push(Diagnostic::Abandoned(outcome.abandoned_callbacks));
    }
    if outcome.interceptor_faults > 0 {
        diagnostics.push(Diagnostic::InterceptorFaults(outcome.interceptor_faults));
    }
    diagnostics
}

/// Print every diagnostic of `outcome` to stderr.
pub fn print_outcome(outcome: &RunOutcome) {
    let stderr = io::stderr();
    let colour = stderr.is_terminal();
    let mut writer = stderr.lock();
    for diagnostic in collect(outcome) {
        write_line(&mut writer, diagnostic.level(), &diagnostic, colour);
    }
}

/// Print a single error line to stderr, e.g. for a fixture that fails to load.
pub fn print_error(msg: impl fmt::Display) {
    let stderr = io::stderr();
    let colour = stderr.is_terminal();
    write_line(&mut stderr.lock(), Level::Error, msg, colour);
}

fn write_line<W: Write>(writer: &mut W, level: Level, msg: impl fmt::Display, colour: bool) {
    let result = if colour {
        writeln!(writer, "{}{}: {}\x1b[0m", level.ansi(), level.label(), msg)
    } else {
        writeln!(writer, "{}: {}", level.label(), msg)
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "could not write diagnostic");
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
