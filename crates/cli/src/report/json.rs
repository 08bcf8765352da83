// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single JSON document written when the run completes.

use std::io::{self, Write};

use serde::Serialize;

use super::{RunEvent, Reporter};
use crate::outcome::{FailureRecord, RunOutcome, Stats, TestRecord};

/// Report document.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub stats: Stats,
    pub passes: &'a [TestRecord],
    pub pending: &'a [TestRecord],
    pub failures: &'a [FailureRecord],
}

impl<'a> From<&'a RunOutcome> for JsonReport<'a> {
    fn from(outcome: &'a RunOutcome) -> Self {
        Self {
            stats: outcome.stats(),
            passes: &outcome.passes,
            pending: &outcome.pending,
            failures: &outcome.failures,
        }
    }
}

pub struct JsonReporter<W: Write> {
    writer: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, _at_ms: u64, event: &RunEvent<'_>) -> io::Result<()> {
        if let RunEvent::RunCompleted(outcome) = event {
            serde_json::to_writer_pretty(&mut self.writer, &JsonReport::from(*outcome))?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
