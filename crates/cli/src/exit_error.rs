// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! `run` returns `ExitError` instead of calling `std::process::exit()`
//! directly, so `main()` alone terminates the process.

use thiserror::Error;

use tcrt_instance::CommandError;

/// Exit code when the launcher script could not be spawned.
pub const EXIT_SPAWN_FAILED: i32 = 127;
/// Exit code when the launcher script was killed after its timeout.
pub const EXIT_TIMED_OUT: i32 = 124;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Exit with `code` without printing anything; the script already spoke.
    pub fn silent(code: i32) -> Self {
        Self::new(code, String::new())
    }
}

impl From<CommandError> for ExitError {
    fn from(err: CommandError) -> Self {
        let code = match err {
            CommandError::SpawnFailed { .. } => EXIT_SPAWN_FAILED,
            CommandError::TimedOut { .. } => EXIT_TIMED_OUT,
            _ => 1,
        };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
