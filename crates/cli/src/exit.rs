// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process exit status.

use crate::outcome::RunOutcome;

/// Exit codes with fixed meaning
pub mod exit_codes {
    /// Clean run
    pub const SUCCESS: i32 = 0;
    /// Fatal run without failure records, or a fixture that failed to load
    pub const ERROR: i32 = 1;
    /// Failure counts saturate here
    pub const MAX: i32 = 255;
}

/// Failure records plus after-end errors, capped; a fatal run never exits 0.
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    let count = outcome
        .failures
        .len()
        .saturating_add(outcome.uncaught_after_end.len());
    let code = i32::try_from(count).map_or(exit_codes::MAX, |count| count.min(exit_codes::MAX));

    if code == exit_codes::SUCCESS && (outcome.fatal || outcome.interceptor_faults > 0) {
        exit_codes::ERROR
    } else {
        code
    }
}

#[cfg(test)]
#[path = "exit_tests.rs"]
mod tests;
