// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tcrt_instance::InstanceAction;

#[derive(Parser, Debug)]
#[command(name = "tcrt", version, about = "Run tc Runtime instance launcher scripts")]
pub struct Cli {
    /// Runtime directory holding the launcher script
    /// [default: $TCRT_RUNTIME_DIR, then the current directory]
    #[arg(short = 'd', long, global = true)]
    pub runtime_dir: Option<PathBuf>,

    /// Kill the script if it runs longer than this [default: $TCRT_TIMEOUT_MS]
    #[arg(
        long,
        global = true,
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: Option<u64>,

    /// Don't mirror output live; print the captured transcript at the end
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the instance in the background
    Start(ScriptArgs),
    /// Stop the instance
    Stop(ScriptArgs),
    /// Stop, then start the instance
    Restart(ScriptArgs),
    /// Run the instance in the foreground
    Run(ScriptArgs),
    /// Report whether the instance is running
    Status(ScriptArgs),
    /// Print the server version
    Version(ScriptArgs),
    /// Pass arguments straight to the launcher script
    Exec(ScriptArgs),
    /// Print the resolved launcher script path
    Path,
}

#[derive(Args, Debug, Default)]
pub struct ScriptArgs {
    /// Extra arguments for the launcher script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Commands {
    /// Launcher arguments for this command, or `None` for `path`.
    pub fn into_script_args(self) -> Option<Vec<String>> {
        let (action, extra) = match self {
            Commands::Start(a) => (Some(InstanceAction::Start), a.args),
            Commands::Stop(a) => (Some(InstanceAction::Stop), a.args),
            Commands::Restart(a) => (Some(InstanceAction::Restart), a.args),
            Commands::Run(a) => (Some(InstanceAction::Run), a.args),
            Commands::Status(a) => (Some(InstanceAction::Status), a.args),
            Commands::Version(a) => (Some(InstanceAction::Version), a.args),
            Commands::Exec(a) => (None, a.args),
            Commands::Path => return None,
        };
        Some(action.map(|a| a.as_str().to_string()).into_iter().chain(extra).collect())
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
