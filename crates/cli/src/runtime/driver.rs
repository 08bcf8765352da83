// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run driver: walks the registry, runs hooks and tests on the event loop,
//! and routes every out-of-band error through attribution and recovery.
//!
//! ## Scheduling
//!
//! - Suite: before-all hooks, tests, child suites, after-all hooks.
//! - Test: before-each hooks root-down, body, after-each hooks bottom-up.
//! - After a runnable settles, its grace window stays open while queued
//!   next-tick callbacks and its own already-due timers drain.
//! - Once aborted nothing else is scheduled, hooks included.
//!
//! After the last runnable the run is ended, `RunCompleted` is reported and
//! already-scheduled callbacks drain up to the drain deadline so late errors
//! still surface.

use std::collections::HashMap;

use crate::attribution::{resolve, ExecutionContext};
use crate::event_loop::{Done, EventLoop, Signal, Task, TaskKind, TimerKey};
use crate::intercept::{guarded, InterceptedError, Interceptor};
use crate::ledger::{Entry, FailureLedger};
use crate::outcome::{ErrorRecord, FailureRecord, RunOutcome, TestRecord};
use crate::recovery::{RecoveryController, Verdict};
use crate::registry::{HookKind, NodeId, Registry, RunnableKind, RunnableState};
use crate::report::{ReportSink, RunEvent, RunnableInfo};
use crate::thrown::Thrown;

use super::RunSettings;

/// Title of failures that belong to no runnable
pub const OUTSIDE_TITLE: &str = "Uncaught error outside test suite";

/// Where scheduling goes after a test or suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Abandon the rest of this suite (and every suite below it on the way up)
    Stop(NodeId),
    Abort,
}

/// How a runnable settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Settled {
    Passed,
    Failed,
    Skipped,
}

/// Executes one registry and produces its [`RunOutcome`].
pub struct Runner {
    registry: Registry,
    settings: RunSettings,
    sink: ReportSink,
    event_loop: EventLoop,
    context: ExecutionContext,
    ledger: FailureLedger,
    recovery: RecoveryController,
    outcome: RunOutcome,
    timeouts: HashMap<NodeId, TimerKey>,
    aborted: bool,
}

impl Runner {
    pub fn new(registry: Registry, settings: RunSettings, sink: ReportSink) -> Self {
        let root = registry.root();
        let outcome = RunOutcome::new(registry.total_suites(root), registry.total_tests(root));
        Self {
            registry,
            settings,
            sink,
            event_loop: EventLoop::new(),
            context: ExecutionContext::new(),
            ledger: FailureLedger::new(),
            recovery: RecoveryController::new(),
            outcome,
            timeouts: HashMap::new(),
            aborted: false,
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run to completion, including the post-run drain
    pub fn run(mut self) -> RunOutcome {
        let mut interceptor = Interceptor::register();
        let root = self.registry.root();

        tracing::info!(
            tests = self.outcome.total_tests,
            suites = self.outcome.total_suites,
            timeout_ms = self.settings.timeout_ms,
            bail = self.settings.bail,
            "run started"
        );
        self.context.begin_run();
        self.sink.emit(
            self.event_loop.now_ms(),
            &RunEvent::RunStarted {
                total_tests: self.outcome.total_tests,
            },
        );

        self.run_suite(root, &mut interceptor);

        self.context.end_run();
        self.outcome.aborted = self.aborted;
        self.sink.emit(
            self.event_loop.now_ms(),
            &RunEvent::RunCompleted(&self.outcome),
        );

        self.drain_after_end(&mut interceptor);

        self.outcome.suppressed = self.ledger.suppressed();
        self.outcome.interceptor_faults = interceptor.faults();
        if self.outcome.interceptor_faults > 0 {
            tracing::warn!(
                faults = self.outcome.interceptor_faults,
                "error interception failed during the run"
            );
            self.outcome.fatal = true;
        }
        self.sink.close();

        tracing::info!(
            passes = self.outcome.passes.len(),
            pending = self.outcome.pending.len(),
            failures = self.outcome.failures.len(),
            after_end = self.outcome.uncaught_after_end.len(),
            fatal = self.outcome.fatal,
            "run finished"
        );
        self.outcome
    }

    fn drain_after_end(&mut self, interceptor: &mut Interceptor) {
        let deadline = self
            .event_loop
            .now_ms()
            .saturating_add(self.settings.drain_ms);
        while let Some(task) = self.event_loop.next_task(Some(deadline)) {
            self.run_task(task, interceptor);
        }

        let abandoned = self.event_loop.abandon();
        if abandoned > 0 {
            tracing::debug!(abandoned, deadline, "callbacks abandoned at drain deadline");
        }
        self.outcome.abandoned_callbacks = abandoned;
    }

    fn run_suite(&mut self, suite: NodeId, interceptor: &mut Interceptor) -> Flow {
        if self.aborted {
            return Flow::Abort;
        }
        if self.registry.total_tests(suite) == 0 {
            return Flow::Continue;
        }

        let info = self.info(suite);
        self.sink
            .emit(self.event_loop.now_ms(), &RunEvent::SuiteStarted(&info));

        let mut flow = Flow::Continue;
        let mut run_body = true;
        for hook in self.registry.hooks(suite, HookKind::BeforeAll) {
            let settled = self.run_runnable(hook, interceptor);
            if self.aborted {
                break;
            }
            if settled != Settled::Passed {
                run_body = false;
                break;
            }
        }

        if run_body && !self.aborted {
            for test in self.registry.tests(suite) {
                flow = self.run_test(test, interceptor);
                if flow != Flow::Continue {
                    break;
                }
            }
            if flow == Flow::Continue {
                for child in self.registry.suites(suite) {
                    flow = self.run_suite(child, interceptor);
                    if flow != Flow::Continue {
                        break;
                    }
                }
            }
        }

        if flow == Flow::Stop(suite) {
            flow = Flow::Continue;
        }

        if !self.aborted {
            for hook in self.registry.hooks(suite, HookKind::AfterAll) {
                let settled = self.run_runnable(hook, interceptor);
                if self.aborted || settled == Settled::Failed {
                    break;
                }
            }
        }

        self.sink
            .emit(self.event_loop.now_ms(), &RunEvent::SuiteEnded(&info));

        if self.aborted {
            Flow::Abort
        } else {
            flow
        }
    }

    fn run_test(&mut self, test: NodeId, interceptor: &mut Interceptor) -> Flow {
        if self.aborted {
            return Flow::Abort;
        }
        if self.registry.get(test).is_declared_pending() {
            self.registry.set_state(test, RunnableState::Skipped);
            self.record_pending(test);
            return Flow::Continue;
        }

        let suite = self.registry.get(test).parent().unwrap_or(self.registry.root());

        for scope in self.registry.lineage(suite) {
            for hook in self.registry.hooks(scope, HookKind::BeforeEach) {
                let settled = self.run_runnable(hook, interceptor);
                if self.aborted {
                    return Flow::Abort;
                }
                match settled {
                    Settled::Passed => {}
                    Settled::Failed => {
                        let after = self.run_after_each(scope, interceptor);
                        return self.stop_at(after.unwrap_or(scope));
                    }
                    Settled::Skipped => {
                        self.registry.set_state(test, RunnableState::Skipped);
                        self.record_pending(test);
                        return match self.run_after_each(scope, interceptor) {
                            Some(failed) => self.stop_at(failed),
                            None if self.aborted => Flow::Abort,
                            None => Flow::Continue,
                        };
                    }
                }
            }
        }

        self.run_runnable(test, interceptor);
        if self.aborted {
            return Flow::Abort;
        }

        match self.run_after_each(suite, interceptor) {
            Some(failed) => self.stop_at(failed),
            None if self.aborted => Flow::Abort,
            None => Flow::Continue,
        }
    }

    fn stop_at(&self, suite: NodeId) -> Flow {
        if self.aborted {
            Flow::Abort
        } else {
            Flow::Stop(suite)
        }
    }

    /// Run after-each hooks from `from` up to the root.
    ///
    /// A failing hook skips the rest of its own suite's after-each hooks.
    /// Returns the outermost suite whose after-each hook failed.
    fn run_after_each(&mut self, from: NodeId, interceptor: &mut Interceptor) -> Option<NodeId> {
        let mut failed = None;
        for scope in self.registry.lineage(from).into_iter().rev() {
            for hook in self.registry.hooks(scope, HookKind::AfterEach) {
                let settled = self.run_runnable(hook, interceptor);
                if self.aborted {
                    return failed;
                }
                if settled == Settled::Failed {
                    failed = Some(scope);
                    break;
                }
            }
        }
        failed
    }

    /// Execute one hook or test body and wait for it to settle.
    fn run_runnable(&mut self, id: NodeId, interceptor: &mut Interceptor) -> Settled {
        let body = self.registry.take_body(id);
        let takes_done = body.as_ref().is_some_and(|body| body.takes_done());

        self.registry.set_state(id, RunnableState::Running);
        self.context.enter(id);
        let info = self.info(id);
        self.sink
            .emit(self.event_loop.now_ms(), &RunEvent::RunnableStarted(&info));
        tracing::debug!(runnable = %id, title = %info.full_title, "runnable started");

        let result = match body {
            Some(body) => {
                let mut scope = self.event_loop.scope(Some(id));
                guarded(|| body.invoke(&mut scope, Done::new(id)))
            }
            None => Ok(()),
        };

        match result {
            Err(error) => {
                self.complete(id, Err(error));
                self.process_signals();
            }
            Ok(()) => {
                self.process_signals();
                if self.is_running(id) {
                    if takes_done {
                        self.arm_timeout(id);
                    } else {
                        self.complete(id, Ok(()));
                    }
                }
            }
        }

        while self.is_running(id) && !self.aborted {
            let Some(task) = self.event_loop.next_task(None) else {
                self.complete(id, Err(Thrown::new("done() was never called")));
                break;
            };
            self.run_task(task, interceptor);
        }

        // Grace window: next-tick work and already-due timers of `id` still belong to it
        while !self.aborted {
            let Some(task) = self
                .event_loop
                .pop_microtask()
                .or_else(|| self.event_loop.pop_due_timer(id))
            else {
                break;
            };
            self.run_task(task, interceptor);
        }

        match self.registry.state(id) {
            RunnableState::Passed => Settled::Passed,
            RunnableState::Skipped => Settled::Skipped,
            RunnableState::Failed | RunnableState::Running | RunnableState::Pending => {
                Settled::Failed
            }
        }
    }

    fn is_running(&self, id: NodeId) -> bool {
        self.registry.state(id) == RunnableState::Running
    }

    fn arm_timeout(&mut self, id: NodeId) {
        if self.settings.timeout_ms == 0 {
            return;
        }
        let key = self
            .event_loop
            .set_runnable_timeout(id, self.settings.timeout_ms);
        self.timeouts.insert(id, key);
    }

    fn run_task(&mut self, task: Task, interceptor: &mut Interceptor) {
        let Task { owner, kind } = task;
        match kind {
            TaskKind::Timeout { after_ms } => {
                if let Some(runnable) = owner {
                    self.timeouts.remove(&runnable);
                    if self.is_running(runnable) {
                        self.complete(runnable, Err(Thrown::timeout(after_ms)));
                    }
                }
            }
            TaskKind::Callback(callback) => {
                let result = {
                    let mut scope = self.event_loop.scope(owner);
                    guarded(|| callback(&mut scope))
                };
                if let Err(error) = result {
                    let intercepted =
                        interceptor.intercept(error, self.event_loop.now_ms(), owner);
                    self.handle_uncaught(intercepted);
                }
            }
        }
        self.process_signals();
    }

    fn process_signals(&mut self) {
        while let Some(signal) = self.event_loop.pop_signal() {
            match signal {
                Signal::Complete { runnable, result } => self.complete(runnable, result),
                Signal::Skip { runnable } => self.skip(runnable),
            }
        }
    }

    /// Settle a running runnable; completions of settled runnables are ignored.
    fn complete(&mut self, id: NodeId, result: Result<(), Thrown>) {
        if !self.is_running(id) {
            match result {
                Err(error) if self.ledger.has_failed(id) => {
                    if self.ledger.record_failure(id, &error) == Entry::Duplicate {
                        let info = self.info(id);
                        self.sink.emit(
                            self.event_loop.now_ms(),
                            &RunEvent::FailureSuppressed {
                                runnable: &info,
                                message: error.message(),
                            },
                        );
                    }
                }
                _ => {
                    tracing::debug!(
                        runnable = %id,
                        state = ?self.registry.state(id),
                        "completion for settled runnable ignored"
                    );
                }
            }
            return;
        }

        if let Some(key) = self.timeouts.remove(&id) {
            self.event_loop.clear_timer(key);
        }

        match result {
            Ok(()) => {
                self.registry.set_state(id, RunnableState::Passed);
                let info = self.info(id);
                if info.kind == RunnableKind::Test {
                    self.outcome.passes.push(TestRecord {
                        runnable: Some(id),
                        title: info.title.clone(),
                        full_title: info.full_title.clone(),
                    });
                }
                self.sink
                    .emit(self.event_loop.now_ms(), &RunEvent::RunnablePassed(&info));
            }
            Err(error) => self.record_failure(id, error),
        }
        self.finish(id);
    }

    fn skip(&mut self, id: NodeId) {
        if !self.is_running(id) {
            tracing::debug!(runnable = %id, "skip for settled runnable ignored");
            return;
        }
        if let Some(key) = self.timeouts.remove(&id) {
            self.event_loop.clear_timer(key);
        }
        self.registry.set_state(id, RunnableState::Skipped);
        if self.registry.get(id).kind() == RunnableKind::Test {
            self.record_pending(id);
        }
        self.finish(id);
    }

    fn finish(&mut self, id: NodeId) {
        let info = self.info(id);
        self.sink
            .emit(self.event_loop.now_ms(), &RunEvent::RunnableEnded(&info));
        self.context.settle(id);
    }

    fn record_pending(&mut self, id: NodeId) {
        let info = self.info(id);
        self.outcome.pending.push(TestRecord {
            runnable: Some(id),
            title: info.title.clone(),
            full_title: info.full_title.clone(),
        });
        self.sink
            .emit(self.event_loop.now_ms(), &RunEvent::RunnablePending(&info));
    }

    /// Record `error` against `id` through the ledger
    fn record_failure(&mut self, id: NodeId, error: Thrown) {
        let info = self.info(id);
        if self.ledger.record_failure(id, &error) == Entry::Duplicate {
            self.sink.emit(
                self.event_loop.now_ms(),
                &RunEvent::FailureSuppressed {
                    runnable: &info,
                    message: error.message(),
                },
            );
            return;
        }

        self.registry.set_state(id, RunnableState::Failed);
        self.outcome.failures.push(FailureRecord {
            runnable: Some(id),
            title: info.title.clone(),
            full_title: info.full_title.clone(),
            err: ErrorRecord {
                message: error.message().to_string(),
            },
        });
        self.sink.emit(
            self.event_loop.now_ms(),
            &RunEvent::RunnableFailed {
                runnable: Some(&info),
                title: &info.title,
                full_title: &info.full_title,
                message: error.message(),
            },
        );
        self.bail_if_requested();
    }

    fn bail_if_requested(&mut self) {
        if self.settings.bail && !self.aborted {
            tracing::info!("bailing after first failure");
            self.aborted = true;
        }
    }

    fn handle_uncaught(&mut self, intercepted: InterceptedError) {
        let attribution = resolve(&self.context);
        let verdict = self
            .recovery
            .decide(attribution, &self.registry, &self.ledger);
        tracing::debug!(
            seq = intercepted.seq,
            at_ms = intercepted.at_ms,
            owner = ?intercepted.owner,
            ?attribution,
            ?verdict,
            error = %intercepted.error.display_error(),
            "uncaught error"
        );

        let error = intercepted.error;
        match verdict {
            Verdict::Fail(id) => self.complete(id, Err(error)),
            Verdict::Suppress(id) => self.record_failure(id, error),
            // The pending record stays; the test is also failed once
            Verdict::FailSkipped(id) => self.record_failure(id, error),
            // Ambiguous needs a context entered on a runnable that never started
            Verdict::Abort(id) | Verdict::Ambiguous(id) => {
                tracing::warn!(
                    runnable = %id,
                    title = %self.registry.full_title(id),
                    error = %error,
                    "uncaught error after the runnable settled, aborting run"
                );
                self.record_failure(id, error);
            }
            // Orphan needs a run in flight with no window open
            Verdict::Orphan => {
                self.outcome.failures.push(FailureRecord {
                    runnable: None,
                    title: OUTSIDE_TITLE.to_string(),
                    full_title: OUTSIDE_TITLE.to_string(),
                    err: ErrorRecord {
                        message: error.message().to_string(),
                    },
                });
                self.sink.emit(
                    self.event_loop.now_ms(),
                    &RunEvent::RunnableFailed {
                        runnable: None,
                        title: OUTSIDE_TITLE,
                        full_title: OUTSIDE_TITLE,
                        message: error.message(),
                    },
                );
                self.bail_if_requested();
            }
            Verdict::Late => {
                tracing::warn!(error = %error, "uncaught error after the run ended");
                self.outcome.uncaught_after_end.push(ErrorRecord {
                    message: error.message().to_string(),
                });
                self.sink.emit(
                    self.event_loop.now_ms(),
                    &RunEvent::UncaughtAfterEnd {
                        message: error.message(),
                    },
                );
            }
        }

        if verdict.is_fatal() {
            self.outcome.fatal = true;
        }
        if verdict.aborts() {
            self.aborted = true;
        }
    }

    fn info(&self, id: NodeId) -> RunnableInfo {
        let node = self.registry.get(id);
        let depth = node.parent().map_or(0, |parent| {
            self.registry
                .lineage(parent)
                .into_iter()
                .filter(|suite| !self.registry.get(*suite).title().is_empty())
                .count()
        });
        RunnableInfo {
            kind: node.kind(),
            title: node.title().to_string(),
            full_title: self.registry.full_title(id),
            depth,
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
