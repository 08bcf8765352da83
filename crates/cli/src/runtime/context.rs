// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run settings merged from CLI, environment and fixtures.

use crate::cli::Cli;
use crate::config::FixtureConfig;

/// Timeout for completion-driven bodies when nothing else is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
/// Virtual time allowed for callbacks to drain after the run ends
pub const DEFAULT_DRAIN_MS: u64 = 5000;

/// Merged configuration with defaults applied.
///
/// Precedence rules:
/// - CLI args (and their environment variables) override fixture fields
/// - The first fixture that sets a field overrides later fixtures
/// - Fixture fields override defaults
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSettings {
    /// 0 disables the timeout
    pub timeout_ms: u64,
    pub drain_ms: u64,
    /// Stop scheduling after the first failure
    pub bail: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            drain_ms: DEFAULT_DRAIN_MS,
            bail: false,
        }
    }
}

impl RunSettings {
    /// Build settings from CLI and fixtures: CLI > fixtures > defaults
    pub fn resolve<'a>(cli: &Cli, fixtures: impl IntoIterator<Item = &'a FixtureConfig>) -> Self {
        let mut fixture_timeout = None;
        let mut fixture_bail = None;
        for config in fixtures {
            fixture_timeout = fixture_timeout.or(config.timeout_ms);
            fixture_bail = fixture_bail.or(config.bail);
        }

        let defaults = Self::default();
        Self {
            timeout_ms: cli
                .timeout
                .or(fixture_timeout)
                .unwrap_or(defaults.timeout_ms),
            drain_ms: cli.drain.unwrap_or(defaults.drain_ms),
            bail: cli.bail || fixture_bail.unwrap_or(defaults.bail),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_drain_ms(mut self, drain_ms: u64) -> Self {
        self.drain_ms = drain_ms;
        self
    }

    pub fn with_bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
