// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Records every run event into an [`EventLog`].

use std::io;

use uncaught_capture::{EventDetail, EventKind, EventLog};

use super::{RunEvent, Reporter, RunnableInfo};

pub struct CaptureReporter {
    log: EventLog,
}

impl CaptureReporter {
    /// Record into `log`; clones of the log observe the same events
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

fn named(info: &RunnableInfo) -> EventDetail {
    EventDetail::runnable(info.title.as_str(), info.full_title.as_str())
}

fn translate(event: &RunEvent<'_>) -> (EventKind, EventDetail) {
    match event {
        RunEvent::RunStarted { .. } => (EventKind::RunStarted, EventDetail::default()),
        RunEvent::SuiteStarted(info) => (EventKind::SuiteStarted, named(info)),
        RunEvent::RunnableStarted(info) => (EventKind::RunnableStarted, named(info)),
        RunEvent::RunnablePassed(info) => (EventKind::RunnablePassed, named(info)),
        RunEvent::RunnablePending(info) => (EventKind::RunnablePending, named(info)),
        RunEvent::RunnableFailed {
            title,
            full_title,
            message,
            ..
        } => (
            EventKind::RunnableFailed,
            EventDetail::runnable(*title, *full_title).with_message(*message),
        ),
        RunEvent::FailureSuppressed { runnable, message } => (
            EventKind::FailureSuppressed,
            named(runnable).with_message(*message),
        ),
        RunEvent::RunnableEnded(info) => (EventKind::RunnableEnded, named(info)),
        RunEvent::SuiteEnded(info) => (EventKind::SuiteEnded, named(info)),
        RunEvent::RunCompleted(_) => (EventKind::RunCompleted, EventDetail::default()),
        RunEvent::UncaughtAfterEnd { message } => {
            (EventKind::UncaughtAfterEnd, EventDetail::message(*message))
        }
    }
}

impl Reporter for CaptureReporter {
    fn report(&mut self, at_ms: u64, event: &RunEvent<'_>) -> io::Result<()> {
        let (kind, detail) = translate(event);
        self.log.record(kind, at_ms, detail);
        Ok(())
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
