// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic single-threaded event loop.
//!
//! ## Ordering
//!
//! - Next-tick callbacks run FIFO and always before any timer.
//! - Timers run by deadline, ties broken by scheduling order.
//! - Taking a timer advances the virtual clock to its deadline.
//!
//! Bodies and callbacks never run here directly: the run driver pops tasks and
//! invokes them through the interceptor, so every error a callback raises is
//! attributed before the next task runs.

use std::collections::{BTreeMap, VecDeque};

use crate::registry::NodeId;
use crate::thrown::Thrown;
use crate::time::VirtualClock;

/// Callback scheduled with [`Scope::next_tick`] or [`Scope::set_timeout`].
///
/// An `Err` returned from a callback is an uncaught error.
pub type Callback = Box<dyn FnOnce(&mut Scope<'_>) -> Result<(), Thrown>>;

/// Completion token handed to a completion-driven body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Done {
    runnable: NodeId,
}

impl Done {
    pub(crate) fn new(runnable: NodeId) -> Self {
        Self { runnable }
    }

    pub fn runnable(&self) -> NodeId {
        self.runnable
    }
}

/// Completion requests collected while bodies and callbacks run.
#[derive(Debug)]
pub enum Signal {
    Complete {
        runnable: NodeId,
        result: Result<(), Thrown>,
    },
    Skip {
        runnable: NodeId,
    },
}

/// Handle for cancelling a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerKey {
    due_ms: u64,
    seq: u64,
}

impl TimerKey {
    pub fn due_ms(&self) -> u64 {
        self.due_ms
    }
}

pub(crate) enum TaskKind {
    Callback(Callback),
    /// Engine-owned timeout for a completion-driven runnable
    Timeout { after_ms: u64 },
}

/// Unit of work popped by the driver.
pub(crate) struct Task {
    /// Runnable whose body (or callback) scheduled this task
    pub(crate) owner: Option<NodeId>,
    pub(crate) kind: TaskKind,
}

/// Queues of pending work plus the virtual clock.
#[derive(Default)]
pub struct EventLoop {
    clock: VirtualClock,
    microtasks: VecDeque<Task>,
    timers: BTreeMap<TimerKey, Task>,
    signals: VecDeque<Signal>,
    next_seq: u64,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Scope for running a body or callback on behalf of `owner`
    pub fn scope(&mut self, owner: Option<NodeId>) -> Scope<'_> {
        Scope {
            event_loop: self,
            owner,
        }
    }

    fn push_microtask(&mut self, task: Task) {
        self.microtasks.push_back(task);
    }

    fn push_timer(&mut self, delay_ms: u64, task: Task) -> TimerKey {
        let key = TimerKey {
            due_ms: self.clock.deadline(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.insert(key, task);
        key
    }

    /// Arm the timeout for a completion-driven runnable
    pub(crate) fn set_runnable_timeout(&mut self, runnable: NodeId, after_ms: u64) -> TimerKey {
        self.push_timer(
            after_ms,
            Task {
                owner: Some(runnable),
                kind: TaskKind::Timeout { after_ms },
            },
        )
    }

    /// Cancel a timer; returns whether it was still pending
    pub fn clear_timer(&mut self, key: TimerKey) -> bool {
        self.timers.remove(&key).is_some()
    }

    /// Next next-tick callback, without touching timers
    pub(crate) fn pop_microtask(&mut self) -> Option<Task> {
        self.microtasks.pop_front()
    }

    /// Next task in loop order.
    ///
    /// Timers due after `deadline` are left in place and the clock does not
    /// move past it.
    pub(crate) fn next_task(&mut self, deadline: Option<u64>) -> Option<Task> {
        if let Some(task) = self.microtasks.pop_front() {
            return Some(task);
        }

        let key = *self.timers.keys().next()?;
        if deadline.is_some_and(|limit| key.due_ms > limit) {
            return None;
        }

        let task = self.timers.remove(&key)?;
        self.clock.advance_to(key.due_ms);
        Some(task)
    }

    /// Earliest timer of `owner` that is already due; the clock stays put
    pub(crate) fn pop_due_timer(&mut self, owner: NodeId) -> Option<Task> {
        let now = self.now_ms();
        let key = self
            .timers
            .iter()
            .take_while(|(key, _)| key.due_ms <= now)
            .find(|(_, task)| task.owner == Some(owner))
            .map(|(key, _)| *key)?;
        self.timers.remove(&key)
    }

    pub(crate) fn pop_signal(&mut self) -> Option<Signal> {
        self.signals.pop_front()
    }

    pub fn pending_microtasks(&self) -> usize {
        self.microtasks.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.microtasks.is_empty() && self.timers.is_empty()
    }

    /// Drop all scheduled work, returning how many callbacks were abandoned
    pub(crate) fn abandon(&mut self) -> usize {
        let count = self
            .microtasks
            .iter()
            .chain(self.timers.values())
            .filter(|task| matches!(task.kind, TaskKind::Callback(_)))
            .count();
        self.microtasks.clear();
        self.timers.clear();
        self.signals.clear();
        count
    }
}

/// What bodies and callbacks can do while they run.
pub struct Scope<'a> {
    event_loop: &'a mut EventLoop,
    owner: Option<NodeId>,
}

impl Scope<'_> {
    /// Run `callback` after the current task, before any timer
    pub fn next_tick<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), Thrown> + 'static,
    {
        let owner = self.owner;
        self.event_loop.push_microtask(Task {
            owner,
            kind: TaskKind::Callback(Box::new(callback)),
        });
    }

    /// Run `callback` once `delay_ms` of virtual time has passed
    pub fn set_timeout<F>(&mut self, delay_ms: u64, callback: F) -> TimerKey
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), Thrown> + 'static,
    {
        let owner = self.owner;
        self.event_loop.push_timer(
            delay_ms,
            Task {
                owner,
                kind: TaskKind::Callback(Box::new(callback)),
            },
        )
    }

    pub fn clear_timeout(&mut self, key: TimerKey) -> bool {
        self.event_loop.clear_timer(key)
    }

    /// Signal successful completion
    pub fn done(&mut self, done: Done) {
        self.event_loop.signals.push_back(Signal::Complete {
            runnable: done.runnable,
            result: Ok(()),
        });
    }

    /// Signal completion with an error
    pub fn fail(&mut self, done: Done, error: impl Into<Thrown>) {
        self.event_loop.signals.push_back(Signal::Complete {
            runnable: done.runnable,
            result: Err(error.into()),
        });
    }

    /// Mark the owning runnable as skipped
    pub fn skip(&mut self) {
        if let Some(runnable) = self.owner {
            self.event_loop
                .signals
                .push_back(Signal::Skip { runnable });
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.event_loop.now_ms()
    }

    /// Runnable this scope acts for
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }
}

#[cfg(test)]
#[path = "event_loop_tests.rs"]
mod tests;
