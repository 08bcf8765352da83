// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reporters and the sink that feeds them.

mod capture;
mod json;
mod spec;

pub use capture::CaptureReporter;
pub use json::{JsonReport, JsonReporter};
pub use spec::SpecReporter;

use std::io;

use crate::outcome::RunOutcome;
use crate::registry::RunnableKind;

/// A suite, test or hook as reporters see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnableInfo {
    pub kind: RunnableKind,
    pub title: String,
    pub full_title: String,
    /// Titled suites above this node
    pub depth: usize,
}

/// What the driver tells reporters, in emission order.
#[derive(Clone, Debug)]
pub enum RunEvent<'a> {
    RunStarted { total_tests: usize },
    SuiteStarted(&'a RunnableInfo),
    RunnableStarted(&'a RunnableInfo),
    RunnablePassed(&'a RunnableInfo),
    RunnablePending(&'a RunnableInfo),
    /// `runnable` is `None` for synthetic failures outside any runnable
    RunnableFailed {
        runnable: Option<&'a RunnableInfo>,
        title: &'a str,
        full_title: &'a str,
        message: &'a str,
    },
    FailureSuppressed {
        runnable: &'a RunnableInfo,
        message: &'a str,
    },
    RunnableEnded(&'a RunnableInfo),
    SuiteEnded(&'a RunnableInfo),
    RunCompleted(&'a RunOutcome),
    UncaughtAfterEnd { message: &'a str },
}

/// Receives run events.
///
/// Errors are I/O failures of the reporter's own output; the sink logs them
/// and keeps going.
pub trait Reporter {
    fn report(&mut self, at_ms: u64, event: &RunEvent<'_>) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fan-out to reporters. Nothing is delivered after [`ReportSink::close`].
#[derive(Default)]
pub struct ReportSink {
    reporters: Vec<Box<dyn Reporter>>,
    closed: bool,
}

impl ReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: impl Reporter + 'static) -> Self {
        self.push(Box::new(reporter));
        self
    }

    pub fn push(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn emit(&mut self, at_ms: u64, event: &RunEvent<'_>) {
        if self.closed {
            tracing::debug!(?event, "event after sink closed dropped");
            return;
        }
        for reporter in &mut self.reporters {
            if let Err(e) = reporter.report(at_ms, event) {
                tracing::warn!(error = %e, "reporter failed to write event");
            }
        }
    }

    /// Flush and close every reporter; later events are dropped
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for reporter in &mut self.reporters {
            if let Err(e) = reporter.close() {
                tracing::warn!(error = %e, "reporter failed to close");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
