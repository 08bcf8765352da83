// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured event data types.

use super::duration_serde;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded reporter event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturedEvent {
    /// Sequence number within the log
    pub seq: u64,

    /// Wall-clock time since the log was created
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,

    /// Virtual time of the run's event loop when the event was emitted
    pub at_ms: u64,

    /// What happened
    pub kind: EventKind,

    /// Who it happened to
    #[serde(flatten)]
    pub detail: EventDetail,
}

/// Event kinds mirrored from the engine's reporter stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RunStarted,
    SuiteStarted,
    RunnableStarted,
    RunnablePassed,
    RunnablePending,
    RunnableFailed,
    FailureSuppressed,
    RunnableEnded,
    SuiteEnded,
    RunCompleted,
    UncaughtAfterEnd,
}

/// Optional payload carried by an event
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        rename = "fullTitle",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EventDetail {
    /// Detail naming a runnable
    pub fn runnable(title: impl Into<String>, full_title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            full_title: Some(full_title.into()),
            message: None,
        }
    }

    /// Attach an error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Detail carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
