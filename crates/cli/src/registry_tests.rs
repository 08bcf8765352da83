// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use yare::parameterized;

fn nested() -> (Registry, NodeId, NodeId, NodeId) {
    let mut registry = Registry::new();
    let root = registry.root();
    let outer = registry.suite(root, "outer");
    let inner = registry.suite(outer, "inner");
    let test = registry.test(inner, "does a thing", Body::noop());
    (registry, outer, inner, test)
}

#[test]
fn test_new_registry_has_untitled_root() {
    let registry = Registry::new();
    let root = registry.get(registry.root());
    assert_eq!(root.kind(), RunnableKind::Suite);
    assert_eq!(root.title(), "");
    assert!(root.parent().is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_full_title_skips_untitled_root() {
    let (registry, outer, _, test) = nested();
    assert_eq!(registry.full_title(outer), "outer");
    assert_eq!(registry.full_title(test), "outer inner does a thing");
    assert_eq!(registry.full_title(registry.root()), "");
}

#[parameterized(
    before_each_unnamed = { HookKind::BeforeEach, None, "\"before each\" hook", RunnableKind::BeforeEach },
    before_all_named = { HookKind::BeforeAll, Some("setup"), "\"before all\" hook: setup", RunnableKind::BeforeAll },
    after_each_empty_name = { HookKind::AfterEach, Some(""), "\"after each\" hook", RunnableKind::AfterEach },
    after_all_unnamed = { HookKind::AfterAll, None, "\"after all\" hook", RunnableKind::AfterAll },
)]
fn test_hook_titles(kind: HookKind, name: Option<&str>, expected: &str, runnable_kind: RunnableKind) {
    let mut registry = Registry::new();
    let root = registry.root();
    let hook = registry.hook(root, kind, name, Body::noop());
    assert_eq!(registry.get(hook).title(), expected);
    assert_eq!(registry.get(hook).kind(), runnable_kind);
    assert_eq!(RunnableKind::from(kind), runnable_kind);
}

#[test]
fn test_hook_full_title_includes_suite() {
    let mut registry = Registry::new();
    let root = registry.root();
    let suite = registry.suite(root, "uncaught");
    let hook = registry.hook(suite, HookKind::BeforeEach, None, Body::noop());
    assert_eq!(registry.full_title(hook), "uncaught \"before each\" hook");
}

#[test]
fn test_hooks_query_ignores_other_hook_kinds() {
    let mut registry = Registry::new();
    let root = registry.root();
    let before = registry.hook(root, HookKind::BeforeEach, None, Body::noop());
    let after = registry.hook(root, HookKind::AfterEach, None, Body::noop());

    assert_eq!(registry.hooks(root, HookKind::BeforeEach), vec![before]);
    assert_eq!(registry.hooks(root, HookKind::AfterEach), vec![after]);
    assert!(registry.tests(root).is_empty());
}

#[test]
fn test_children_are_split_by_kind_in_registration_order() {
    let mut registry = Registry::new();
    let root = registry.root();
    let a = registry.test(root, "a", Body::noop());
    let hook = registry.hook(root, HookKind::AfterEach, None, Body::noop());
    let child = registry.suite(root, "child");
    let b = registry.pending_test(root, "b");

    assert_eq!(registry.tests(root), vec![a, b]);
    assert_eq!(registry.suites(root), vec![child]);
    assert_eq!(registry.hooks(root, HookKind::AfterEach), vec![hook]);
    assert!(registry.hooks(root, HookKind::BeforeAll).is_empty());
}

#[test]
fn test_pending_test_has_no_body() {
    let mut registry = Registry::new();
    let root = registry.root();
    let pending = registry.pending_test(root, "later");
    assert!(registry.get(pending).is_declared_pending());
    assert!(registry.take_body(pending).is_none());
}

#[test]
fn test_take_body_only_once() {
    let mut registry = Registry::new();
    let root = registry.root();
    let test = registry.test(root, "t", Body::with_done(|_, _| Ok(())));
    assert!(registry.get(test).takes_done());
    assert!(registry.take_body(test).is_some());
    assert!(registry.take_body(test).is_none());
    assert!(!registry.get(test).takes_done());
}

#[test]
fn test_totals_count_subtree() {
    let (mut registry, outer, _, _) = nested();
    let root = registry.root();
    registry.test(outer, "second", Body::noop());
    registry.suite(root, "empty");

    assert_eq!(registry.total_tests(root), 2);
    assert_eq!(registry.total_tests(outer), 2);
    assert_eq!(registry.total_suites(root), 3);
}

#[test]
fn test_lineage_runs_root_first() {
    let (registry, outer, inner, _) = nested();
    assert_eq!(registry.lineage(inner), vec![registry.root(), outer, inner]);
}

#[test]
fn test_state_transitions_are_recorded() {
    let (mut registry, _, _, test) = nested();
    assert_eq!(registry.state(test), RunnableState::Pending);
    registry.set_state(test, RunnableState::Running);
    assert!(!registry.state(test).is_terminal());
    registry.set_state(test, RunnableState::Passed);
    assert!(registry.state(test).is_terminal());
}

#[test]
fn test_retain_tests_drops_non_matching() {
    let (mut registry, outer, inner, test) = nested();
    let other = registry.test(outer, "skipped by grep", Body::noop());

    let pattern = Regex::new("does").unwrap();
    assert_eq!(registry.retain_tests(&pattern), 1);
    assert_eq!(registry.tests(inner), vec![test]);
    assert!(!registry.tests(outer).contains(&other));
    assert_eq!(registry.total_tests(registry.root()), 1);
}

#[test]
fn test_foreign_id_falls_back_to_root() {
    let registry = Registry::new();
    let foreign = NodeId(42);
    assert_eq!(registry.get(foreign).kind(), RunnableKind::Suite);
    assert_eq!(foreign.to_string(), "#42");
}
