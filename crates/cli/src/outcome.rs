// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate result of a run.

use serde::Serialize;

use crate::registry::NodeId;

/// A passed or pending test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    #[serde(skip)]
    pub runnable: Option<NodeId>,
    pub title: String,
    pub full_title: String,
}

/// Error details as reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub message: String,
}

/// A failed test, hook or synthetic failure unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    /// `None` for synthetic failures outside any runnable
    #[serde(skip)]
    pub runnable: Option<NodeId>,
    pub title: String,
    pub full_title: String,
    pub err: ErrorRecord,
}

/// Counts as reporters print them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub suites: usize,
    pub tests: usize,
    pub passes: usize,
    pub pending: usize,
    pub failures: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub passes: Vec<TestRecord>,
    pub pending: Vec<TestRecord>,
    pub failures: Vec<FailureRecord>,
    pub uncaught_after_end: Vec<ErrorRecord>,
    /// Exit must be non-zero even without failure records
    pub fatal: bool,
    /// Scheduling stopped early (fatal verdict or bail)
    pub aborted: bool,
    pub interceptor_faults: u64,
    /// Duplicate failures swallowed by the ledger
    pub suppressed: usize,
    /// Callbacks still pending at the drain deadline
    pub abandoned_callbacks: usize,
    pub total_suites: usize,
    pub total_tests: usize,
}

impl RunOutcome {
    pub fn new(total_suites: usize, total_tests: usize) -> Self {
        Self {
            total_suites,
            total_tests,
            ..Self::default()
        }
    }

    pub fn has_passed(&self, runnable: NodeId) -> bool {
        self.passes.iter().any(|record| record.runnable == Some(runnable))
    }

    pub fn stats(&self) -> Stats {
        Stats {
            suites: self.total_suites,
            tests: self.total_tests,
            passes: self.passes.len(),
            pending: self.pending.len(),
            failures: self.failures.len(),
        }
    }

    /// Clean run: no failures, nothing after end, not fatal
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.uncaught_after_end.is_empty() && !self.fatal
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
