// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolve configuration and run one launcher invocation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tcrt_instance::{Discard, ServerInstanceCommand};

use crate::args::Cli;
use crate::env;
use crate::exit_error::ExitError;

pub async fn run(cli: Cli) -> Result<()> {
    let runtime_dir = resolve_runtime_dir(cli.runtime_dir)?;
    let mut command = ServerInstanceCommand::new(&runtime_dir);
    if let Some(timeout) = cli.timeout_ms.map(Duration::from_millis).or_else(env::timeout) {
        command = command.with_timeout(timeout);
    }
    if cli.quiet {
        command = command.with_stdout_sink(Discard).with_stderr_sink(Discard);
    }

    let Some(args) = cli.command.into_script_args() else {
        println!("{command}");
        return Ok(());
    };

    tracing::debug!(script = %command, ?args, "running launcher script");
    let result = command.execute(&args).await;
    if cli.quiet {
        print!("{}", command.output());
    }

    let code = result.map_err(ExitError::from)?;
    if code != 0 {
        tracing::info!(code, "launcher script reported failure");
        return Err(ExitError::silent(code).into());
    }
    Ok(())
}

fn resolve_runtime_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag.or_else(env::runtime_dir) {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("cannot determine current directory"),
    }
}
