// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime module for orchestrating a run.
//!
//! This module provides:
//! - [`RunSettings`] - Merged configuration from fixtures + CLI
//! - [`Runner`] - Run driver executing the registry
//! - [`RunnerBuilder`] - Fluent API for constructing Runner instances

mod builder;
mod context;
mod driver;

pub use builder::{BuildError, RunnerBuilder};
pub use context::{RunSettings, DEFAULT_DRAIN_MS, DEFAULT_TIMEOUT_MS};
pub use driver::{Runner, OUTSIDE_TITLE};
