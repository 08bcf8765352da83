// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared helpers for running the `uncaught` binary against fixtures.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::NamedTempFile;

/// Environment variables that would change run settings
const ENV_VARS: [&str; 4] = [
    "UNCAUGHT_LOG",
    "UNCAUGHT_TIMEOUT_MS",
    "UNCAUGHT_DRAIN_MS",
    "UNCAUGHT_CAPTURE",
];

/// Path to a bundled fixture under `fixtures/uncaught/`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/uncaught")
        .join(name)
}

/// Create a temporary fixture file.
/// Detects JSON vs TOML content and uses appropriate extension
pub fn write_fixture(content: &str) -> NamedTempFile {
    let suffix = if content.trim().starts_with('{') {
        ".json"
    } else {
        ".toml"
    };
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Command for the binary with a clean environment
pub fn uncaught() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_uncaught"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Run with `--reporter json` and parse stdout
pub fn run_json(args: &[&str]) -> (Value, Output) {
    let output = uncaught()
        .args(["--reporter", "json"])
        .args(args)
        .output()
        .expect("Failed to run uncaught");
    let report = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not a JSON report ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    });
    (report, output)
}

/// Titles of one report section
pub fn titles(report: &Value, section: &str) -> Vec<String> {
    report[section]
        .as_array()
        .unwrap_or_else(|| panic!("missing section {section}"))
        .iter()
        .map(|entry| entry["title"].as_str().unwrap().to_string())
        .collect()
}

/// Error messages of the failures section
pub fn failure_messages(report: &Value) -> Vec<String> {
    report["failures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["err"]["message"].as_str().unwrap().to_string())
        .collect()
}
