// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture loading, validation and registration.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{FixtureConfig, HookSpec, Step, SuiteSpec, TestSpec};
use crate::event_loop::{Done, Scope};
use crate::registry::{Body, NodeId, Registry};
use crate::thrown::Thrown;

/// Errors that can occur when loading fixtures
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// A validated fixture
#[derive(Clone, Debug)]
pub struct Fixture {
    path: Option<PathBuf>,
    config: FixtureConfig,
}

impl Fixture {
    /// Load a fixture from a TOML or JSON file
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        let config: FixtureConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };

        let mut fixture = Self::from_config(config)?;
        fixture.path = Some(path.to_path_buf());
        Ok(fixture)
    }

    /// Create a fixture from a config object
    pub fn from_config(config: FixtureConfig) -> Result<Self, FixtureError> {
        for hook in &config.hooks {
            validate_hook(hook, "")?;
        }
        for test in &config.tests {
            validate_test(test, "")?;
        }
        for suite in &config.suites {
            validate_suite(suite, "")?;
        }
        Ok(Self { path: None, config })
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name for logs: the configured name, else the file name
    pub fn display_name(&self) -> String {
        if !self.config.name.is_empty() {
            return self.config.name.clone();
        }
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Register hooks, tests and suites under `parent`
    pub fn register(&self, registry: &mut Registry, parent: NodeId) {
        register_members(
            registry,
            parent,
            &self.config.hooks,
            &self.config.tests,
            &self.config.suites,
        );
    }
}

fn register_members(
    registry: &mut Registry,
    parent: NodeId,
    hooks: &[HookSpec],
    tests: &[TestSpec],
    suites: &[SuiteSpec],
) {
    for hook in hooks {
        registry.hook(
            parent,
            hook.kind,
            hook.title.as_deref(),
            compile_body(&hook.steps, hook.done),
        );
    }
    for test in tests {
        if test.skip {
            registry.pending_test(parent, test.title.as_str());
        } else {
            registry.test(
                parent,
                test.title.as_str(),
                compile_body(&test.steps, test.done),
            );
        }
    }
    for suite in suites {
        let id = registry.suite(parent, suite.title.as_str());
        register_members(registry, id, &suite.hooks, &suite.tests, &suite.suites);
    }
}

fn compile_body(steps: &[Step], takes_done: bool) -> Body {
    let steps = steps.to_vec();
    if takes_done {
        Body::with_done(move |scope, done| run_steps(&steps, scope, Some(done)))
    } else {
        Body::sync(move |scope| run_steps(&steps, scope, None))
    }
}

/// Execute steps in order; `throw`, `panic` and `skip` end the sequence.
pub fn run_steps(steps: &[Step], scope: &mut Scope<'_>, done: Option<Done>) -> Result<(), Thrown> {
    for step in steps {
        match step {
            Step::Done => {
                if let Some(done) = done {
                    scope.done(done);
                }
            }
            Step::DoneError(message) => {
                if let Some(done) = done {
                    scope.fail(done, message.as_str());
                }
            }
            Step::Throw(message) => return Err(Thrown::new(message.as_str())),
            Step::Panic(message) => std::panic::panic_any(message.clone()),
            Step::Skip => {
                scope.skip();
                return Ok(());
            }
            Step::NextTick(inner) => {
                let inner = inner.clone();
                scope.next_tick(move |scope| run_steps(&inner, scope, done));
            }
            Step::SetTimeout { ms, steps: inner } => {
                let inner = inner.clone();
                scope.set_timeout(*ms, move |scope| run_steps(&inner, scope, done));
            }
        }
    }
    Ok(())
}

fn qualified(prefix: &str, title: &str) -> String {
    if prefix.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", prefix, title)
    }
}

fn validate_suite(suite: &SuiteSpec, prefix: &str) -> Result<(), FixtureError> {
    if suite.title.trim().is_empty() {
        return Err(FixtureError::Validation(format!(
            "suite title must not be empty (inside '{}')",
            prefix
        )));
    }
    let name = qualified(prefix, &suite.title);
    for hook in &suite.hooks {
        validate_hook(hook, &name)?;
    }
    for test in &suite.tests {
        validate_test(test, &name)?;
    }
    for child in &suite.suites {
        validate_suite(child, &name)?;
    }
    Ok(())
}

fn validate_test(test: &TestSpec, prefix: &str) -> Result<(), FixtureError> {
    if test.title.trim().is_empty() {
        return Err(FixtureError::Validation(format!(
            "test title must not be empty (inside '{}')",
            prefix
        )));
    }
    if !test.done && test.steps.iter().any(Step::signals_done) {
        return Err(FixtureError::Validation(format!(
            "test '{}' signals done but does not set `done = true`",
            qualified(prefix, &test.title)
        )));
    }
    Ok(())
}

fn validate_hook(hook: &HookSpec, prefix: &str) -> Result<(), FixtureError> {
    if hook.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(FixtureError::Validation(format!(
            "hook title must not be blank (inside '{}')",
            prefix
        )));
    }
    if !hook.done && hook.steps.iter().any(Step::signals_done) {
        return Err(FixtureError::Validation(format!(
            "{:?} hook in '{}' signals done but does not set `done = true`",
            hook.kind, prefix
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "fixture_tests.rs"]
mod tests;
