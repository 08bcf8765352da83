// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Execution context and attribution of out-of-band errors.
//!
//! The context tracks which runnable is current and in which window:
//!
//! ```text
//! enter(a)      settle(a)          enter(b) / end_run()
//!    |--Active--|-------Grace-------|
//! ```
//!
//! An error arriving while `a` is active or in grace belongs to `a`. Suites
//! never become current, so a hook or test always wins over its ancestors.

use serde::Serialize;

use crate::registry::NodeId;

/// How a current runnable is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Body is executing or waiting for completion
    Active,
    /// Completed; late errors still belong to it until the next runnable starts
    Grace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// The current-runnable pointer for one run.
#[derive(Clone, Debug, Default)]
pub struct ExecutionContext {
    current: Option<(NodeId, Window)>,
    phase: RunPhase,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_run(&mut self) {
        self.phase = RunPhase::Running;
        self.current = None;
    }

    /// Make `runnable` current, closing any previous grace window
    pub fn enter(&mut self, runnable: NodeId) {
        self.current = Some((runnable, Window::Active));
    }

    /// Move `runnable` into its grace window; no-op if it is not current
    pub fn settle(&mut self, runnable: NodeId) {
        if let Some((current, window)) = self.current.as_mut() {
            if *current == runnable {
                *window = Window::Grace;
            }
        }
    }

    /// Clear the pointer and mark the run ended
    pub fn end_run(&mut self) {
        self.current = None;
        self.phase = RunPhase::Ended;
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current.map(|(runnable, _)| runnable)
    }

    pub fn window(&self) -> Option<Window> {
        self.current.map(|(_, window)| window)
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Whether `runnable` is current and still executing
    pub fn is_active(&self, runnable: NodeId) -> bool {
        self.current == Some((runnable, Window::Active))
    }
}

/// Where an intercepted error belongs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribution {
    Active(NodeId),
    Grace(NodeId),
    /// No current runnable while the run is in progress or not yet started
    Outside,
    /// The run has ended
    AfterEnd,
}

impl Attribution {
    pub fn target(self) -> Option<NodeId> {
        match self {
            Attribution::Active(runnable) | Attribution::Grace(runnable) => Some(runnable),
            Attribution::Outside | Attribution::AfterEnd => None,
        }
    }
}

pub fn resolve(context: &ExecutionContext) -> Attribution {
    if context.phase == RunPhase::Ended {
        return Attribution::AfterEnd;
    }
    match context.current {
        Some((runnable, Window::Active)) => Attribution::Active(runnable),
        Some((runnable, Window::Grace)) => Attribution::Grace(runnable),
        None => Attribution::Outside,
    }
}

#[cfg(test)]
#[path = "attribution_tests.rs"]
mod tests;
