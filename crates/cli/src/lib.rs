// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test-execution engine with uncaught-error attribution and recovery.
//!
//! Tests and hooks run on a deterministic event loop. Errors raised outside
//! the normal completion path (callbacks scheduled with `next_tick` or
//! `set_timeout`, panics) are intercepted, attributed to the runnable that
//! owns them, and either fail that runnable exactly once, get suppressed as
//! duplicates, or abort the run.
//!
//! ```ignore
//! use uncaught::runtime::RunnerBuilder;
//!
//! let outcome = RunnerBuilder::new()
//!     .with_fixture(Path::new("fixtures/uncaught/hook.toml"))?
//!     .build()
//!     .run();
//! std::process::exit(uncaught::exit::exit_code(&outcome));
//! ```

pub mod attribution;
/// Re-exported event capture types from the uncaught-capture crate.
pub mod capture {
    pub use uncaught_capture::{CapturedEvent, EventDetail, EventKind, EventLog};
}
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod env;
pub mod event_loop;
pub mod exit;
pub mod fixture;
pub mod intercept;
pub mod ledger;
pub mod logging;
pub mod outcome;
pub mod recovery;
pub mod registry;
pub mod report;
pub mod runtime;
pub mod thrown;
pub mod time;
