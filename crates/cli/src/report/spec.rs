// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Indented console listing with a pass/pending/fail epilogue.

use std::io::{self, Write};

use super::{RunEvent, Reporter};
use crate::outcome::RunOutcome;
use crate::registry::RunnableKind;

pub struct SpecReporter<W: Write> {
    writer: W,
    failure_number: usize,
}

impl SpecReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SpecReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failure_number: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn indent(depth: usize) -> String {
        "  ".repeat(depth + 1)
    }

    fn epilogue(&mut self, outcome: &RunOutcome) -> io::Result<()> {
        let stats = outcome.stats();
        writeln!(self.writer)?;
        writeln!(self.writer, "  {} passing", stats.passes)?;
        if stats.pending > 0 {
            writeln!(self.writer, "  {} pending", stats.pending)?;
        }
        if stats.failures > 0 {
            writeln!(self.writer, "  {} failing", stats.failures)?;
        }

        for (index, failure) in outcome.failures.iter().enumerate() {
            writeln!(self.writer)?;
            writeln!(self.writer, "  {}) {}:", index + 1, failure.full_title)?;
            writeln!(self.writer, "     Error: {}", failure.err.message)?;
        }
        writeln!(self.writer)
    }
}

impl<W: Write> Reporter for SpecReporter<W> {
    fn report(&mut self, _at_ms: u64, event: &RunEvent<'_>) -> io::Result<()> {
        match event {
            RunEvent::RunStarted { .. } => writeln!(self.writer),
            RunEvent::SuiteStarted(suite) if !suite.title.is_empty() => {
                writeln!(self.writer, "{}{}", Self::indent(suite.depth), suite.title)
            }
            RunEvent::RunnablePassed(test) if test.kind == RunnableKind::Test => writeln!(
                self.writer,
                "{}  \u{2713} {}",
                Self::indent(test.depth),
                test.title
            ),
            RunEvent::RunnablePending(test) => {
                writeln!(self.writer, "{}  - {}", Self::indent(test.depth), test.title)
            }
            RunEvent::RunnableFailed {
                runnable, title, ..
            } => {
                self.failure_number += 1;
                let depth = runnable.map_or(0, |info| info.depth);
                writeln!(
                    self.writer,
                    "{}  {}) {}",
                    Self::indent(depth),
                    self.failure_number,
                    title
                )
            }
            RunEvent::RunCompleted(outcome) => self.epilogue(outcome),
            _ => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
