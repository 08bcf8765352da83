// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Virtual time for deterministic runs.
//!
//! Runs never sleep: when the event loop is waiting for a timer it jumps the
//! clock straight to the timer's deadline. Elapsed time is therefore a pure
//! function of the fixture, which keeps ordering of timers and timeouts
//! reproducible.

use std::time::Duration;

/// Monotonic virtual clock in milliseconds since the start of the run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now_millis: u64,
}

impl VirtualClock {
    /// Create a clock starting at a given time
    pub fn new(start_millis: u64) -> Self {
        Self {
            now_millis: start_millis,
        }
    }

    /// Create a clock starting at zero
    pub fn at_zero() -> Self {
        Self::new(0)
    }

    /// Current time in milliseconds
    pub fn now_millis(&self) -> u64 {
        self.now_millis
    }

    /// Current time as a Duration
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.now_millis)
    }

    /// Advance by milliseconds, saturating
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_millis = self.now_millis.saturating_add(ms);
    }

    /// Move to `millis` unless that would go backwards
    pub fn advance_to(&mut self, millis: u64) {
        self.now_millis = self.now_millis.max(millis);
    }

    /// Absolute deadline `ms` from now
    pub fn deadline(&self, ms: u64) -> u64 {
        self.now_millis.saturating_add(ms)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
