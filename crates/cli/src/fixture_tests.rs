// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::event_loop::{EventLoop, Signal};
use crate::registry::HookKind;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fixture(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/uncaught")
}

#[test]
fn test_load_toml() {
    let file = write_fixture(
        ".toml",
        r#"
        name = "basic"
        timeout_ms = 100

        [[tests]]
        title = "a"
        "#,
    );
    let fixture = Fixture::load(file.path()).unwrap();
    assert_eq!(fixture.config().timeout_ms, Some(100));
    assert_eq!(fixture.display_name(), "basic");
    assert_eq!(fixture.path(), Some(file.path()));
}

#[test]
fn test_load_json_by_extension() {
    let file = write_fixture(
        ".json",
        r#"{ "tests": [{ "title": "a", "done": true, "steps": ["done"] }] }"#,
    );
    let fixture = Fixture::load(file.path()).unwrap();
    assert_eq!(fixture.config().tests[0].steps, vec![Step::Done]);
}

#[test]
fn test_display_name_falls_back_to_file_name() {
    let file = write_fixture(".toml", "");
    let fixture = Fixture::load(file.path()).unwrap();
    let expected = file.path().file_name().unwrap().to_string_lossy();
    assert_eq!(fixture.display_name(), expected);
}

#[test]
fn test_load_reports_parse_errors() {
    let toml = write_fixture(".toml", "tests = 3");
    assert!(matches!(
        Fixture::load(toml.path()),
        Err(FixtureError::Toml(_))
    ));

    let json = write_fixture(".json", "{");
    assert!(matches!(
        Fixture::load(json.path()),
        Err(FixtureError::Json(_))
    ));

    assert!(matches!(
        Fixture::load(Path::new("/nonexistent/fixture.toml")),
        Err(FixtureError::Io(_))
    ));
}

#[yare::parameterized(
    empty_test_title = { r#"
        [[tests]]
        title = " "
    "#, "test title" },
    empty_suite_title = { r#"
        [[suites]]
        title = ""
    "#, "suite title" },
    blank_hook_title = { r#"
        [[hooks]]
        kind = "before_all"
        title = ""
    "#, "hook title" },
    done_without_flag = { r#"
        [[suites]]
        title = "outer"

        [[suites.tests]]
        title = "inner"
        steps = [{ next_tick = ["done"] }]
    "#, "'outer inner' signals done" },
    hook_done_without_flag = { r#"
        [[hooks]]
        kind = "after_each"
        steps = [{ done_error = "x" }]
    "#, "AfterEach hook" },
)]
fn test_validation_rejects(content: &str, needle: &str) {
    let config: FixtureConfig = toml::from_str(content).unwrap();
    match Fixture::from_config(config) {
        Err(FixtureError::Validation(msg)) => {
            assert!(msg.contains(needle), "{msg:?} should contain {needle:?}")
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_register_builds_tree() {
    let config: FixtureConfig = toml::from_str(
        r#"
        [[hooks]]
        kind = "before_all"

        [[tests]]
        title = "top"

        [[suites]]
        title = "outer"

        [[suites.hooks]]
        kind = "before_each"
        title = "setup"

        [[suites.tests]]
        title = "skipped"
        skip = true

        [[suites.suites]]
        title = "inner"

        [[suites.suites.tests]]
        title = "deep"
        done = true
        "#,
    )
    .unwrap();
    let fixture = Fixture::from_config(config).unwrap();

    let mut registry = Registry::new();
    let root = registry.root();
    fixture.register(&mut registry, root);

    assert_eq!(registry.total_tests(root), 3);
    let hooks = registry.hooks(root, HookKind::BeforeAll);
    assert_eq!(hooks.len(), 1);
    assert_eq!(registry.full_title(hooks[0]), "\"before all\" hook");

    let outer = registry.suites(root)[0];
    let setup = registry.hooks(outer, HookKind::BeforeEach)[0];
    assert_eq!(
        registry.full_title(setup),
        "outer \"before each\" hook: setup"
    );
    let skipped = registry.tests(outer)[0];
    assert!(registry.get(skipped).is_declared_pending());

    let inner = registry.suites(outer)[0];
    let deep = registry.tests(inner)[0];
    assert_eq!(registry.full_title(deep), "outer inner deep");
    assert!(registry.get(deep).takes_done());
}

#[test]
fn test_run_steps_throw_stops_sequence() {
    let mut event_loop = EventLoop::new();
    let steps = vec![
        Step::Throw("first".into()),
        Step::NextTick(vec![Step::Throw("never scheduled".into())]),
    ];

    let err = run_steps(&steps, &mut event_loop.scope(None), None).unwrap_err();

    assert_eq!(err.message(), "first");
    assert!(event_loop.is_idle());
}

#[test]
fn test_run_steps_schedules_callbacks() {
    let mut event_loop = EventLoop::new();
    let steps = vec![
        Step::NextTick(vec![Step::Done]),
        Step::SetTimeout {
            ms: 5,
            steps: vec![Step::Throw("later".into())],
        },
    ];

    run_steps(&steps, &mut event_loop.scope(None), None).unwrap();

    assert_eq!(event_loop.pending_microtasks(), 1);
    assert_eq!(event_loop.pending_timers(), 1);
}

#[test]
fn test_run_steps_signals_completion_in_order() {
    let mut registry = Registry::new();
    let root = registry.root();
    let test = registry.test(root, "t", Body::noop());

    let mut event_loop = EventLoop::new();
    let steps = vec![Step::DoneError("bad".into()), Step::Done];
    run_steps(
        &steps,
        &mut event_loop.scope(Some(test)),
        Some(Done::new(test)),
    )
    .unwrap();

    match event_loop.pop_signal() {
        Some(Signal::Complete { result: Err(err), .. }) => assert_eq!(err.message(), "bad"),
        other => panic!("expected failed completion, got {other:?}"),
    }
    assert!(matches!(
        event_loop.pop_signal(),
        Some(Signal::Complete { result: Ok(()), .. })
    ));
}

#[test]
fn test_run_steps_skip_ends_sequence() {
    let mut registry = Registry::new();
    let root = registry.root();
    let test = registry.test(root, "t", Body::noop());

    let mut event_loop = EventLoop::new();
    let steps = vec![
        Step::Skip,
        Step::Throw("after skip".into()),
        Step::NextTick(vec![Step::Throw("never scheduled".into())]),
    ];
    run_steps(&steps, &mut event_loop.scope(Some(test)), None).unwrap();

    assert!(matches!(
        event_loop.pop_signal(),
        Some(Signal::Skip { runnable }) if runnable == test
    ));
    assert!(event_loop.pop_signal().is_none());
    assert!(event_loop.is_idle());
}

#[test]
fn test_run_steps_ignores_done_without_token() {
    let mut event_loop = EventLoop::new();
    run_steps(&[Step::Done], &mut event_loop.scope(None), None).unwrap();
    assert!(event_loop.pop_signal().is_none());
}

#[test]
fn test_bundled_fixtures_load() {
    let mut loaded = 0;
    for entry in std::fs::read_dir(fixtures_dir()).unwrap() {
        let path = entry.unwrap().path();
        let fixture = Fixture::load(&path)
            .unwrap_or_else(|e| panic!("{} failed to load: {e}", path.display()));
        assert!(!fixture.display_name().is_empty());

        let mut registry = Registry::new();
        let root = registry.root();
        fixture.register(&mut registry, root);
        assert!(registry.total_tests(root) > 0, "{}", path.display());
        loaded += 1;
    }
    assert_eq!(loaded, 8);
}
