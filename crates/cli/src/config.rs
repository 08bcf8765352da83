// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture configuration types for TOML/JSON fixture files.
//!
//! ```toml
//! name = "uncaught hook"
//!
//! [[suites]]
//! title = "uncaught"
//!
//! [[suites.hooks]]
//! kind = "before_each"
//! done = true
//! steps = [{ next_tick = [{ throw = "oh no" }] }]
//!
//! [[suites.tests]]
//! title = "test"
//! ```

use serde::{Deserialize, Serialize};

pub use crate::registry::HookKind;

/// Top-level fixture
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Name for logging/debugging
    #[serde(default)]
    pub name: String,

    /// Timeout for completion-driven bodies (overridden by `--timeout`)
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Stop after the first failure (`--bail` also enables it)
    #[serde(default)]
    pub bail: Option<bool>,

    /// Hooks of the root suite
    #[serde(default)]
    pub hooks: Vec<HookSpec>,

    /// Tests of the root suite
    #[serde(default)]
    pub tests: Vec<TestSpec>,

    #[serde(default)]
    pub suites: Vec<SuiteSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteSpec {
    pub title: String,

    #[serde(default)]
    pub hooks: Vec<HookSpec>,

    #[serde(default)]
    pub tests: Vec<TestSpec>,

    #[serde(default)]
    pub suites: Vec<SuiteSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TestSpec {
    pub title: String,

    /// Completion-driven: the test finishes on `done`/`done_error` or times out
    #[serde(default)]
    pub done: bool,

    /// Declared pending; never runs
    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HookSpec {
    pub kind: HookKind,

    /// Appended to the conventional hook title
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One action of a body or callback, run in order.
///
/// In a body, `throw` is an ordinary synchronous failure; inside `next_tick`
/// or `set_timeout` it is an uncaught error.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Signal successful completion
    Done,
    /// Signal completion with an error
    DoneError(String),
    /// Raise an error; later steps do not run
    Throw(String),
    /// Panic with this message; later steps do not run
    Panic(String),
    /// Mark the owning runnable skipped; later steps do not run
    Skip,
    NextTick(Vec<Step>),
    SetTimeout {
        ms: u64,
        #[serde(default)]
        steps: Vec<Step>,
    },
}

impl Step {
    /// Whether this step (or a nested one) signals completion
    pub fn signals_done(&self) -> bool {
        match self {
            Step::Done | Step::DoneError(_) => true,
            Step::NextTick(steps) | Step::SetTimeout { steps, .. } => {
                steps.iter().any(Step::signals_done)
            }
            Step::Throw(_) | Step::Panic(_) | Step::Skip => false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
