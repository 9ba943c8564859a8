// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tcrt: run tc Runtime instance launcher scripts from the command line

mod args;
mod env;
mod exit_error;
mod logging;
mod run;

use clap::Parser;

use crate::exit_error::ExitError;

#[tokio::main]
async fn main() {
    let cli = args::Cli::parse();
    logging::init(&env::log_filter());

    if let Err(err) = run::run(cli).await {
        let code = match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("tcrt: {}", exit.message);
                }
                exit.code
            }
            None => {
                eprintln!("tcrt: {err:#}");
                1
            }
        };
        std::process::exit(code);
    }
}
