// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error values raised by test bodies and callbacks.

use std::fmt;
use thiserror::Error;

/// Where a raised error came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Returned as `Err` from a body or callback
    Raised,
    /// Unwound from a panic, with the source location when the panic hook saw it
    Panic { location: Option<String> },
    /// Produced by the engine when a completion-driven runnable never finished
    Timeout { after_ms: u64 },
}

/// An error raised by a body or a scheduled callback.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Thrown {
    message: String,
    origin: Origin,
}

impl Thrown {
    /// Raise an error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin: Origin::Raised,
        }
    }

    pub(crate) fn panic(message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            message: message.into(),
            origin: Origin::Panic { location },
        }
    }

    pub(crate) fn timeout(after_ms: u64) -> Self {
        Self {
            message: format!(
                "Timeout of {}ms exceeded. For async tests and hooks, ensure \"done()\" is called.",
                after_ms
            ),
            origin: Origin::Timeout { after_ms },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_panic(&self) -> bool {
        matches!(self.origin, Origin::Panic { .. })
    }

    /// `Error: <message>` as printed in failure details
    pub fn display_error(&self) -> DisplayError<'_> {
        DisplayError(self)
    }
}

impl From<&str> for Thrown {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Thrown {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Formats a [`Thrown`] the way failure details print it.
pub struct DisplayError<'a>(&'a Thrown);

impl fmt::Display for DisplayError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.origin {
            Origin::Panic {
                location: Some(location),
            } => write!(f, "Error: {} (panicked at {})", self.0.message, location),
            _ => write!(f, "Error: {}", self.0.message),
        }
    }
}

#[cfg(test)]
#[path = "thrown_tests.rs"]
mod tests;
