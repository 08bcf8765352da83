// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by `uncaught` are named here. Command-line
//! flags pick theirs up through clap's `env` support.

/// Log filter directives (`tracing_subscriber::EnvFilter` syntax).
pub const UNCAUGHT_LOG: &str = "UNCAUGHT_LOG";

/// Default per-runnable timeout for completion-driven bodies.
pub const UNCAUGHT_TIMEOUT_MS: &str = "UNCAUGHT_TIMEOUT_MS";

/// Virtual time allowed for callbacks to drain after the run ends.
pub const UNCAUGHT_DRAIN_MS: &str = "UNCAUGHT_DRAIN_MS";

/// JSONL event capture file.
pub const UNCAUGHT_CAPTURE: &str = "UNCAUGHT_CAPTURE";

/// `UNCAUGHT_LOG`, when set and non-empty.
pub fn log_filter() -> Option<String> {
    non_empty(std::env::var(UNCAUGHT_LOG).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
