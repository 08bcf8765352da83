// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run event capture and recording for test assertions.
//!
//! This crate records the reporter events of an `uncaught` run, either in
//! memory or as JSONL, so tests and tooling can inspect exactly what a run
//! reported and in which order.

mod duration_serde;
mod event;
mod log;

pub use event::{CapturedEvent, EventDetail, EventKind};
pub use log::EventLog;
