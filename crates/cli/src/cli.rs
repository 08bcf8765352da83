// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Run test fixtures with uncaught-error attribution and recovery
#[derive(Parser, Debug, Clone)]
#[command(
    name = "uncaught",
    version,
    about = "Run test fixtures with uncaught-error attribution and recovery"
)]
pub struct Cli {
    /// Fixture files (TOML, or JSON with a .json extension)
    #[arg(value_name = "FIXTURE", required = true)]
    pub fixtures: Vec<PathBuf>,

    /// Reporter for run output
    #[arg(long, value_enum, default_value = "spec")]
    pub reporter: ReporterKind,

    /// Timeout for completion-driven tests and hooks, in milliseconds (0 disables)
    #[arg(long, short = 't', value_name = "MS", env = "UNCAUGHT_TIMEOUT_MS")]
    pub timeout: Option<u64>,

    /// Virtual time to keep draining callbacks after the run ends, in milliseconds
    #[arg(long, value_name = "MS", env = "UNCAUGHT_DRAIN_MS")]
    pub drain: Option<u64>,

    /// Stop scheduling after the first failure
    #[arg(long, short = 'b')]
    pub bail: bool,

    /// Only run tests whose full title matches this pattern
    #[arg(long, short = 'g', value_name = "PATTERN")]
    pub grep: Option<String>,

    /// Record every reporter event to this JSONL file
    #[arg(long, value_name = "PATH", env = "UNCAUGHT_CAPTURE")]
    pub capture: Option<PathBuf>,

    /// Debug logging on stderr (overridden by UNCAUGHT_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Reporter choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReporterKind {
    /// Indented listing with a summary
    #[default]
    Spec,
    /// One JSON document on completion
    Json,
}

impl Cli {
    /// Checks clap cannot express.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.grep.as_deref().is_some_and(str::is_empty) {
            return Err("--grep pattern must not be empty");
        }
        if self.capture.as_ref().is_some_and(|path| path.as_os_str().is_empty()) {
            return Err("--capture path must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
