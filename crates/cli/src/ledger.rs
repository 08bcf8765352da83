// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Failure ledger: each runnable is recorded as failed at most once.

use std::collections::HashSet;

use crate::registry::NodeId;
use crate::thrown::Thrown;

/// Result of [`FailureLedger::record_failure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    Recorded,
    Duplicate,
}

#[derive(Debug, Default)]
pub struct FailureLedger {
    failed: HashSet<NodeId>,
    suppressed: usize,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, runnable: NodeId, error: &Thrown) -> Entry {
        if self.failed.insert(runnable) {
            Entry::Recorded
        } else {
            self.suppressed += 1;
            tracing::debug!(
                runnable = %runnable,
                error = %error,
                "suppressed duplicate failure"
            );
            Entry::Duplicate
        }
    }

    pub fn has_failed(&self, runnable: NodeId) -> bool {
        self.failed.contains(&runnable)
    }

    /// Distinct runnables recorded
    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }

    /// Duplicate failures swallowed so far
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
