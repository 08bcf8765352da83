// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RunnerBuilder for constructing a Runner with a fluent API.

use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use uncaught_capture::EventLog;

use crate::cli::{Cli, ReporterKind};
use crate::fixture::{Fixture, FixtureError};
use crate::registry::Registry;
use crate::report::{CaptureReporter, JsonReporter, ReportSink, Reporter, SpecReporter};

use super::driver::Runner;
use super::RunSettings;

/// Errors that can occur while assembling a run
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: FixtureError,
    },

    #[error("Invalid --grep pattern: {0}")]
    Grep(#[from] regex::Error),

    #[error("Failed to create capture file '{path}': {source}")]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Builder for [`Runner`] instances.
///
/// ```ignore
/// let outcome = RunnerBuilder::new()
///     .with_fixture(path)?
///     .reporter(JsonReporter::stdout())
///     .build()
///     .run();
/// ```
pub struct RunnerBuilder {
    registry: Registry,
    fixtures: Vec<Fixture>,
    settings: Option<RunSettings>,
    sink: ReportSink,
    grep: Option<Regex>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            fixtures: Vec::new(),
            settings: None,
            sink: ReportSink::new(),
            grep: None,
        }
    }

    /// Start from an already populated registry
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Load a fixture and register its contents under the root suite
    pub fn with_fixture(mut self, path: &Path) -> Result<Self, BuildError> {
        let fixture = Fixture::load(path).map_err(|source| BuildError::Fixture {
            path: path.to_path_buf(),
            source,
        })?;
        let root = self.registry.root();
        fixture.register(&mut self.registry, root);
        tracing::debug!(fixture = %fixture.display_name(), path = %path.display(), "fixture registered");
        self.fixtures.push(fixture);
        Ok(self)
    }

    pub fn settings(mut self, settings: RunSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.sink.push(Box::new(reporter));
        self
    }

    /// Keep only tests whose full title matches `pattern`
    pub fn grep(mut self, pattern: &str) -> Result<Self, BuildError> {
        self.grep = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Record events into `log` as well
    pub fn capture(self, log: EventLog) -> Self {
        self.reporter(CaptureReporter::new(log))
    }

    /// Assemble everything the command line asks for.
    pub fn from_cli(cli: &Cli) -> Result<Self, BuildError> {
        cli.validate()
            .map_err(|msg| BuildError::Validation(msg.to_string()))?;

        let mut builder = Self::new();
        for path in &cli.fixtures {
            builder = builder.with_fixture(path)?;
        }

        let settings = RunSettings::resolve(cli, builder.fixtures.iter().map(Fixture::config));
        builder = builder.settings(settings);

        if let Some(pattern) = cli.grep.as_deref() {
            builder = builder.grep(pattern)?;
        }

        builder = match cli.reporter {
            ReporterKind::Spec => builder.reporter(SpecReporter::stdout()),
            ReporterKind::Json => builder.reporter(JsonReporter::stdout()),
        };

        if let Some(path) = cli.capture.as_ref() {
            let log = EventLog::with_file(path).map_err(|source| BuildError::Capture {
                path: path.clone(),
                source,
            })?;
            builder = builder.capture(log);
        }

        Ok(builder)
    }

    pub fn build(mut self) -> Runner {
        if let Some(pattern) = self.grep.as_ref() {
            let removed = self.registry.retain_tests(pattern);
            tracing::debug!(pattern = %pattern, removed, "tests filtered by --grep");
        }
        let settings = self.settings.unwrap_or_default();
        Runner::new(self.registry, settings, self.sink)
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
