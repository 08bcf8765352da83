// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup.
//!
//! Logs go to stderr so reporter output on stdout stays machine-readable.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::env;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Filter directives used when `UNCAUGHT_LOG` is unset
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "uncaught=debug"
    } else {
        "warn"
    }
}

/// Build the filter: `UNCAUGHT_LOG` wins, then the verbosity default.
///
/// Invalid `UNCAUGHT_LOG` directives fall back to the default.
pub fn filter(log_env: Option<&str>, verbose: bool) -> EnvFilter {
    log_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

/// Install the stderr subscriber. Calling this more than once is harmless.
pub fn init_tracing(verbose: bool) {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let log_env = env::log_filter();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(log_env.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();

    let _ = TRACING_INIT.set(());
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
