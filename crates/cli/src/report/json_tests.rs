// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::outcome::ErrorRecord;

#[test]
fn test_writes_document_only_on_completion() {
    let mut reporter = JsonReporter::new(Vec::new());
    reporter
        .report(0, &RunEvent::RunStarted { total_tests: 1 })
        .unwrap();
    reporter
        .report(0, &RunEvent::UncaughtAfterEnd { message: "late" })
        .unwrap();
    assert!(reporter.into_inner().is_empty());
}

#[test]
fn test_document_shape() {
    let mut outcome = RunOutcome::new(1, 2);
    outcome.passes.push(TestRecord {
        runnable: None,
        title: "a".to_string(),
        full_title: "s a".to_string(),
    });
    outcome.failures.push(FailureRecord {
        runnable: None,
        title: "\"before each\" hook".to_string(),
        full_title: "s \"before each\" hook".to_string(),
        err: ErrorRecord {
            message: "oops".to_string(),
        },
    });

    let mut reporter = JsonReporter::new(Vec::new());
    reporter.report(7, &RunEvent::RunCompleted(&outcome)).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
    assert_eq!(
        json["stats"],
        serde_json::json!({ "suites": 1, "tests": 2, "passes": 1, "pending": 0, "failures": 1 })
    );
    assert_eq!(json["passes"][0]["fullTitle"], "s a");
    assert_eq!(json["pending"], serde_json::json!([]));
    assert_eq!(json["failures"][0]["err"]["message"], "oops");
}
