// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
use super::*;
use proptest::prelude::*;
use rstest::rstest;

fn failed(title: &str, message: &str) -> EventDetail {
    EventDetail::runnable(title, format!("suite {}", title)).with_message(message)
}

#[test]
fn test_record_and_retrieve() {
    let log = EventLog::new();

    log.record(EventKind::RunStarted, 0, EventDetail::default());
    log.record(EventKind::RunnableFailed, 10, failed("t1", "boom"));

    assert_eq!(log.len(), 2);
    let events = log.events();
    assert_eq!(events[0].seq, 0);
    assert_eq!(events[1].seq, 1);
    assert_eq!(events[1].at_ms, 10);
    assert_eq!(events[1].detail.full_title.as_deref(), Some("suite t1"));
}

#[rstest]
#[case(1, 1)]
#[case(5, 2)]
#[case(10, 5)]
#[case(3, 10)]
fn test_last_n(#[case] total: usize, #[case] n: usize) {
    let log = EventLog::new();

    for i in 0..total {
        log.record(
            EventKind::RunnablePassed,
            i as u64,
            EventDetail::runnable(format!("t{}", i), format!("s t{}", i)),
        );
    }

    let last = log.last(n);
    let expected_len = n.min(total);
    assert_eq!(last.len(), expected_len);
    if let Some(first) = last.first() {
        assert_eq!(first.seq as usize, total - expected_len);
    }
}

#[test]
fn test_titles_and_messages_filter_by_kind() {
    let log = EventLog::new();
    log.record(
        EventKind::RunnablePassed,
        0,
        EventDetail::runnable("a", "a"),
    );
    log.record(EventKind::RunnableFailed, 1, failed("b", "first"));
    log.record(EventKind::FailureSuppressed, 2, failed("b", "second"));
    log.record(EventKind::RunnableFailed, 3, failed("c", "third"));

    assert_eq!(log.titles(EventKind::RunnableFailed), vec!["b", "c"]);
    assert_eq!(log.messages(EventKind::RunnableFailed), vec!["first", "third"]);
    assert_eq!(log.count_kind(EventKind::FailureSuppressed), 1);
    assert_eq!(
        log.kinds(),
        vec![
            EventKind::RunnablePassed,
            EventKind::RunnableFailed,
            EventKind::FailureSuppressed,
            EventKind::RunnableFailed,
        ]
    );
}

#[test]
fn test_clones_share_storage() {
    let log = EventLog::new();
    let handle = log.clone();

    handle.record(EventKind::RunCompleted, 0, EventDetail::default());
    assert_eq!(log.len(), 1);

    log.clear();
    assert!(handle.is_empty());
}

#[test]
fn test_with_file_writes_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let log = EventLog::with_file(&path).unwrap();
    log.record(EventKind::RunStarted, 0, EventDetail::default());
    log.record(
        EventKind::UncaughtAfterEnd,
        100,
        EventDetail::message("Unexpected crash"),
    );

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let last: CapturedEvent = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(last.kind, EventKind::UncaughtAfterEnd);
    assert_eq!(last.detail.message.as_deref(), Some("Unexpected crash"));
}

proptest! {
    #[test]
    fn prop_sequence_numbers_are_dense(count in 0usize..50) {
        let log = EventLog::new();
        for i in 0..count {
            log.record(EventKind::RunnableStarted, i as u64, EventDetail::default());
        }
        let seqs: Vec<u64> = log.events().iter().map(|e| e.seq).collect();
        let expected: Vec<u64> = (0..count as u64).collect();
        prop_assert_eq!(seqs, expected);
    }
}
