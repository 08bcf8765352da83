// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runnable registry: the tree of suites, tests and hooks.
//!
//! Nodes live in an arena and refer to their parent suite by [`NodeId`], so
//! the tree has no ownership cycles and every node outlives the run for final
//! reporting.

use crate::event_loop::{Done, Scope};
use crate::thrown::Thrown;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in the registry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnableKind {
    Suite,
    Test,
    BeforeAll,
    AfterAll,
    BeforeEach,
    AfterEach,
}

/// Hook variants of [`RunnableKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    BeforeAll,
    AfterAll,
    BeforeEach,
    AfterEach,
}

impl HookKind {
    /// Label used in titles, e.g. `before each`
    pub fn label(self) -> &'static str {
        match self {
            HookKind::BeforeAll => "before all",
            HookKind::AfterAll => "after all",
            HookKind::BeforeEach => "before each",
            HookKind::AfterEach => "after each",
        }
    }
}

impl From<HookKind> for RunnableKind {
    fn from(kind: HookKind) -> Self {
        match kind {
            HookKind::BeforeAll => RunnableKind::BeforeAll,
            HookKind::AfterAll => RunnableKind::AfterAll,
            HookKind::BeforeEach => RunnableKind::BeforeEach,
            HookKind::AfterEach => RunnableKind::AfterEach,
        }
    }
}

/// Lifecycle of a runnable.
///
/// `Skipped` is what reporters count as "pending".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnableState {
    /// Registered, not yet run
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
}

impl RunnableState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunnableState::Passed | RunnableState::Failed | RunnableState::Skipped
        )
    }
}

/// Body completing when it returns.
pub type SyncBody = Box<dyn FnOnce(&mut Scope<'_>) -> Result<(), Thrown>>;

/// Body completing when its [`Done`] token is signalled.
pub type DoneBody = Box<dyn FnOnce(&mut Scope<'_>, Done) -> Result<(), Thrown>>;

/// Executable part of a test or hook.
pub enum Body {
    Sync(SyncBody),
    WithDone(DoneBody),
}

impl Body {
    pub fn sync<F>(f: F) -> Self
    where
        F: FnOnce(&mut Scope<'_>) -> Result<(), Thrown> + 'static,
    {
        Body::Sync(Box::new(f))
    }

    pub fn with_done<F>(f: F) -> Self
    where
        F: FnOnce(&mut Scope<'_>, Done) -> Result<(), Thrown> + 'static,
    {
        Body::WithDone(Box::new(f))
    }

    /// Body that passes immediately
    pub fn noop() -> Self {
        Body::sync(|_| Ok(()))
    }

    pub fn takes_done(&self) -> bool {
        matches!(self, Body::WithDone(_))
    }

    pub(crate) fn invoke(self, scope: &mut Scope<'_>, done: Done) -> Result<(), Thrown> {
        match self {
            Body::Sync(f) => f(scope),
            Body::WithDone(f) => f(scope, done),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sync(_) => f.write_str("Body::Sync(..)"),
            Body::WithDone(_) => f.write_str("Body::WithDone(..)"),
        }
    }
}

/// A suite, test or hook.
#[derive(Debug)]
pub struct Runnable {
    kind: RunnableKind,
    title: String,
    parent: Option<NodeId>,
    state: RunnableState,
    declared_pending: bool,
    body: Option<Body>,
    children: Vec<NodeId>,
}

impl Runnable {
    pub fn kind(&self) -> RunnableKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn state(&self) -> RunnableState {
        self.state
    }

    /// Registered without a body, or explicitly marked to skip
    pub fn is_declared_pending(&self) -> bool {
        self.declared_pending
    }

    pub fn takes_done(&self) -> bool {
        self.body.as_ref().is_some_and(Body::takes_done)
    }
}

/// Arena of runnables rooted at an untitled suite.
#[derive(Debug)]
pub struct Registry {
    nodes: Vec<Runnable>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            nodes: vec![Runnable {
                kind: RunnableKind::Suite,
                title: String::new(),
                parent: None,
                state: RunnableState::Pending,
                declared_pending: false,
                body: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Register a child suite
    pub fn suite(&mut self, parent: NodeId, title: impl Into<String>) -> NodeId {
        self.push(parent, RunnableKind::Suite, title.into(), None, false)
    }

    /// Register a test
    pub fn test(&mut self, parent: NodeId, title: impl Into<String>, body: Body) -> NodeId {
        self.push(parent, RunnableKind::Test, title.into(), Some(body), false)
    }

    /// Register a test that is reported pending without running
    pub fn pending_test(&mut self, parent: NodeId, title: impl Into<String>) -> NodeId {
        self.push(parent, RunnableKind::Test, title.into(), None, true)
    }

    /// Register a hook; `name` is appended to the conventional hook title.
    pub fn hook(
        &mut self,
        parent: NodeId,
        kind: HookKind,
        name: Option<&str>,
        body: Body,
    ) -> NodeId {
        let title = match name {
            Some(name) if !name.is_empty() => format!("\"{}\" hook: {}", kind.label(), name),
            _ => format!("\"{}\" hook", kind.label()),
        };
        self.push(parent, kind.into(), title, Some(body), false)
    }

    fn push(
        &mut self,
        parent: NodeId,
        kind: RunnableKind,
        title: String,
        body: Option<Body>,
        declared_pending: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Runnable {
            kind,
            title,
            parent: Some(parent),
            state: RunnableState::Pending,
            declared_pending,
            body,
            children: Vec::new(),
        });
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    /// Look up a node.
    ///
    /// Ids are only minted by this registry, so lookups of foreign ids fall
    /// back to the root suite rather than panicking.
    pub fn get(&self, id: NodeId) -> &Runnable {
        &self.nodes[self.checked(id)]
    }

    fn checked(&self, id: NodeId) -> usize {
        if id.0 < self.nodes.len() {
            id.0
        } else {
            0
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn state(&self, id: NodeId) -> RunnableState {
        self.get(id).state
    }

    pub(crate) fn set_state(&mut self, id: NodeId, state: RunnableState) {
        let index = self.checked(id);
        self.nodes[index].state = state;
    }

    pub(crate) fn take_body(&mut self, id: NodeId) -> Option<Body> {
        let index = self.checked(id);
        self.nodes[index].body.take()
    }

    fn children_of(&self, suite: NodeId, kind: RunnableKind) -> Vec<NodeId> {
        self.get(suite)
            .children
            .iter()
            .copied()
            .filter(|child| self.get(*child).kind == kind)
            .collect()
    }

    pub fn tests(&self, suite: NodeId) -> Vec<NodeId> {
        self.children_of(suite, RunnableKind::Test)
    }

    pub fn suites(&self, suite: NodeId) -> Vec<NodeId> {
        self.children_of(suite, RunnableKind::Suite)
    }

    pub fn hooks(&self, suite: NodeId, kind: HookKind) -> Vec<NodeId> {
        self.children_of(suite, kind.into())
    }

    /// Tests in the subtree of `suite`
    pub fn total_tests(&self, suite: NodeId) -> usize {
        self.tests(suite).len()
            + self
                .suites(suite)
                .into_iter()
                .map(|child| self.total_tests(child))
                .sum::<usize>()
    }

    /// Suites in the subtree of `suite`, excluding `suite` itself
    pub fn total_suites(&self, suite: NodeId) -> usize {
        self.suites(suite)
            .into_iter()
            .map(|child| 1 + self.total_suites(child))
            .sum()
    }

    /// Suites from the root down to `suite`, inclusive
    pub fn lineage(&self, suite: NodeId) -> Vec<NodeId> {
        let mut chain = vec![suite];
        let mut cursor = self.get(suite).parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.get(parent).parent;
        }
        chain.reverse();
        chain
    }

    /// Ancestor titles joined with the node's own title
    pub fn full_title(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            let runnable = self.get(node);
            if !runnable.title.is_empty() {
                parts.push(&runnable.title);
            }
            cursor = runnable.parent;
        }
        parts.reverse();
        parts.join(" ")
    }

    /// Drop tests whose full title does not match `pattern`
    pub fn retain_tests(&mut self, pattern: &Regex) -> usize {
        let doomed: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.get(*id).kind == RunnableKind::Test)
            .filter(|id| self.is_attached(*id))
            .filter(|id| !pattern.is_match(&self.full_title(*id)))
            .collect();

        for id in &doomed {
            if let Some(parent) = self.get(*id).parent {
                let index = self.checked(parent);
                self.nodes[index].children.retain(|child| child != id);
            }
        }
        doomed.len()
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.get(id)
            .parent
            .is_some_and(|parent| self.get(parent).children.contains(&id))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
