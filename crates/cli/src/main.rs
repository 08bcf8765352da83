// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `uncaught` binary entry point.

use clap::Parser;

use uncaught::cli::Cli;
use uncaught::diagnostics::{self, print_error};
use uncaught::exit::{exit_code, exit_codes};
use uncaught::logging::init_tracing;
use uncaught::runtime::RunnerBuilder;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runner = match RunnerBuilder::from_cli(&cli) {
        Ok(builder) => builder.build(),
        Err(e) => {
            print_error(e);
            std::process::exit(exit_codes::ERROR);
        }
    };

    let outcome = runner.run();

    diagnostics::print_outcome(&outcome);

    std::process::exit(exit_code(&outcome));
}
