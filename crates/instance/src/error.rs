// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised when a launcher script could not be run to completion.
//!
//! A script that runs and exits non-zero is not an error; its exit code is
//! returned to the caller as data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::sink::OutputStream;

/// Fatal failure of a single invocation. None of these are retried.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The script is missing, not executable, or the OS refused to fork.
    #[error("failed to spawn `{}`: {source}", script.display())]
    SpawnFailed { script: PathBuf, source: std::io::Error },

    /// Reading one of the child's output pipes failed.
    #[error("failed reading {stream} of `{}`: {source}", script.display())]
    StreamFailed { script: PathBuf, stream: OutputStream, source: std::io::Error },

    /// Waiting for the child to exit failed.
    #[error("failed waiting for `{}`: {source}", script.display())]
    WaitFailed { script: PathBuf, source: std::io::Error },

    /// A drain task was cancelled or panicked before reaching end-of-stream.
    #[error("{stream} drain of `{}` was interrupted", script.display())]
    Interrupted { script: PathBuf, stream: OutputStream },

    /// The child outlived the configured timeout and was killed.
    #[error("`{}` did not exit within {}ms", script.display(), timeout.as_millis())]
    TimedOut { script: PathBuf, timeout: Duration },

    /// The private runtime behind `execute_blocking` could not be built.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Coarse failure category: what went wrong, not where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Spawn,
    Stream,
    Wait,
}

impl CommandError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CommandError::SpawnFailed { .. } | CommandError::Runtime(_) => FailureKind::Spawn,
            CommandError::StreamFailed { .. } => FailureKind::Stream,
            CommandError::WaitFailed { .. }
            | CommandError::Interrupted { .. }
            | CommandError::TimedOut { .. } => FailureKind::Wait,
        }
    }

    /// Script the failed invocation targeted, when known.
    pub fn script(&self) -> Option<&Path> {
        match self {
            CommandError::SpawnFailed { script, .. }
            | CommandError::StreamFailed { script, .. }
            | CommandError::WaitFailed { script, .. }
            | CommandError::Interrupted { script, .. }
            | CommandError::TimedOut { script, .. } => Some(script),
            CommandError::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
