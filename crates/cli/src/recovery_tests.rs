// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::attribution::{resolve, ExecutionContext};
use crate::registry::Body;
use crate::thrown::Thrown;
use yare::parameterized;

fn one_test(state: RunnableState) -> (Registry, NodeId) {
    let mut registry = Registry::new();
    let root = registry.root();
    let test = registry.test(root, "t", Body::noop());
    registry.set_state(test, state);
    (registry, test)
}

#[parameterized(
    running = { RunnableState::Running, ErrorClass::Recoverable },
    failed = { RunnableState::Failed, ErrorClass::Duplicate },
    skipped = { RunnableState::Skipped, ErrorClass::Recoverable },
    passed = { RunnableState::Passed, ErrorClass::Fatal },
    never_started = { RunnableState::Pending, ErrorClass::Fatal },
)]
fn test_verdict_class_by_target_state(state: RunnableState, expected: ErrorClass) {
    let (registry, test) = one_test(state);
    let mut controller = RecoveryController::new();

    let verdict = controller.decide(Attribution::Grace(test), &registry, &FailureLedger::new());

    assert_eq!(verdict.class(), expected);
    assert_eq!(verdict.target(), Some(test));
    assert_eq!(controller.count(expected), 1);
}

#[parameterized(
    running = { RunnableState::Running, Verdict::Fail },
    skipped = { RunnableState::Skipped, Verdict::FailSkipped },
    passed = { RunnableState::Passed, Verdict::Abort },
    never_started = { RunnableState::Pending, Verdict::Ambiguous },
)]
fn test_verdict_by_target_state(state: RunnableState, expected: fn(NodeId) -> Verdict) {
    let (registry, test) = one_test(state);
    let verdict =
        RecoveryController::new().decide(Attribution::Active(test), &registry, &FailureLedger::new());
    assert_eq!(verdict, expected(test));
}

#[test]
fn test_ledger_entry_wins_over_state() {
    let (registry, test) = one_test(RunnableState::Passed);
    let mut ledger = FailureLedger::new();
    ledger.record_failure(test, &Thrown::new("earlier"));

    let verdict = RecoveryController::new().decide(Attribution::Grace(test), &registry, &ledger);
    assert_eq!(verdict, Verdict::Suppress(test));
    assert!(!verdict.is_fatal());
}

#[test]
fn test_unowned_errors() {
    let registry = Registry::new();
    let ledger = FailureLedger::new();
    let mut controller = RecoveryController::new();

    let orphan = controller.decide(Attribution::Outside, &registry, &ledger);
    assert_eq!(orphan, Verdict::Orphan);
    assert!(!orphan.is_fatal());

    let late = controller.decide(Attribution::AfterEnd, &registry, &ledger);
    assert_eq!(late, Verdict::Late);
    assert!(late.is_fatal());
    assert!(!late.aborts());
    assert_eq!(controller.count(ErrorClass::Unattributable), 1);
}

#[test]
fn test_only_fatal_class_aborts() {
    let (_, test) = one_test(RunnableState::Passed);
    assert!(Verdict::Abort(test).aborts());
    assert!(Verdict::Ambiguous(test).aborts());
    assert!(!Verdict::Fail(test).aborts());
    assert!(!Verdict::FailSkipped(test).aborts());
    assert!(!Verdict::Suppress(test).aborts());
}

#[test]
fn test_context_without_window_yields_orphan_then_ambiguous() {
    let (registry, test) = one_test(RunnableState::Pending);
    let ledger = FailureLedger::new();
    let mut controller = RecoveryController::new();
    let mut context = ExecutionContext::new();
    context.begin_run();

    let verdict = controller.decide(resolve(&context), &registry, &ledger);
    assert_eq!(verdict, Verdict::Orphan);
    assert_eq!(verdict.class(), ErrorClass::Recoverable);

    context.enter(test);
    let verdict = controller.decide(resolve(&context), &registry, &ledger);
    assert_eq!(verdict, Verdict::Ambiguous(test));
    assert!(verdict.aborts());
    assert_eq!(controller.count(ErrorClass::Recoverable), 1);
    assert_eq!(controller.count(ErrorClass::Fatal), 1);
}
