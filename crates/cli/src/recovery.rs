// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery decisions for attributed errors.
//!
//! | target state        | verdict       | class          |
//! |---------------------|---------------|----------------|
//! | running             | `Fail`        | recoverable    |
//! | failed / in ledger  | `Suppress`    | duplicate      |
//! | skipped             | `FailSkipped` | recoverable    |
//! | passed              | `Abort`       | fatal          |
//! | never started       | `Ambiguous`   | fatal          |
//! | none, run in flight | `Orphan`      | recoverable    |
//! | none, run ended     | `Late`        | unattributable |
//!
//! The run driver enters a runnable before any callback can be scheduled and
//! keeps the grace window open until the next one enters, so it never yields
//! `Orphan`, and it never attributes to a runnable it has not started, so it
//! never yields `Ambiguous`. Both arise when an [`ExecutionContext`] is driven
//! directly, and the driver still handles them.
//!
//! [`ExecutionContext`]: crate::attribution::ExecutionContext

use serde::Serialize;

use crate::attribution::Attribution;
use crate::ledger::FailureLedger;
use crate::registry::{NodeId, Registry, RunnableState};

/// What the driver does with an intercepted error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Fail the running target; the run continues
    Fail(NodeId),
    /// Target already failed; count nothing
    Suppress(NodeId),
    /// Fail the skipped target; its pending record stays
    FailSkipped(NodeId),
    /// Target already passed; keep the pass, add the failure, bail out
    Abort(NodeId),
    /// Target never started; synthetic failure, bail out
    Ambiguous(NodeId),
    /// Synthetic failure outside any runnable; the run continues
    Orphan,
    /// Error after the run ended
    Late,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Recoverable,
    Duplicate,
    Fatal,
    Unattributable,
}

impl Verdict {
    pub fn class(self) -> ErrorClass {
        match self {
            Verdict::Fail(_) | Verdict::FailSkipped(_) | Verdict::Orphan => ErrorClass::Recoverable,
            Verdict::Suppress(_) => ErrorClass::Duplicate,
            Verdict::Abort(_) | Verdict::Ambiguous(_) => ErrorClass::Fatal,
            Verdict::Late => ErrorClass::Unattributable,
        }
    }

    pub fn target(self) -> Option<NodeId> {
        match self {
            Verdict::Fail(id)
            | Verdict::Suppress(id)
            | Verdict::FailSkipped(id)
            | Verdict::Abort(id)
            | Verdict::Ambiguous(id) => Some(id),
            Verdict::Orphan | Verdict::Late => None,
        }
    }

    /// Whether this verdict makes the outcome fatal
    pub fn is_fatal(self) -> bool {
        matches!(self.class(), ErrorClass::Fatal | ErrorClass::Unattributable)
    }

    /// Whether the driver must stop scheduling runnables
    pub fn aborts(self) -> bool {
        self.class() == ErrorClass::Fatal
    }
}

/// Decides verdicts and tallies them per class.
#[derive(Debug, Default)]
pub struct RecoveryController {
    recoverable: usize,
    duplicate: usize,
    fatal: usize,
    unattributable: usize,
}

impl RecoveryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(
        &mut self,
        attribution: Attribution,
        registry: &Registry,
        ledger: &FailureLedger,
    ) -> Verdict {
        let verdict = match attribution {
            Attribution::AfterEnd => Verdict::Late,
            Attribution::Outside => Verdict::Orphan,
            Attribution::Active(target) | Attribution::Grace(target) => {
                if ledger.has_failed(target) {
                    Verdict::Suppress(target)
                } else {
                    match registry.state(target) {
                        RunnableState::Running => Verdict::Fail(target),
                        RunnableState::Failed => Verdict::Suppress(target),
                        RunnableState::Skipped => Verdict::FailSkipped(target),
                        RunnableState::Passed => Verdict::Abort(target),
                        RunnableState::Pending => Verdict::Ambiguous(target),
                    }
                }
            }
        };

        match verdict.class() {
            ErrorClass::Recoverable => self.recoverable += 1,
            ErrorClass::Duplicate => self.duplicate += 1,
            ErrorClass::Fatal => self.fatal += 1,
            ErrorClass::Unattributable => self.unattributable += 1,
        }
        verdict
    }

    /// Verdicts decided so far in `class`
    pub fn count(&self, class: ErrorClass) -> usize {
        match class {
            ErrorClass::Recoverable => self.recoverable,
            ErrorClass::Duplicate => self.duplicate,
            ErrorClass::Fatal => self.fatal,
            ErrorClass::Unattributable => self.unattributable,
        }
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
