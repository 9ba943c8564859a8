// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

/// Default log filter when `TCRT_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime directory fallback when `--runtime-dir` is not given.
pub fn runtime_dir() -> Option<PathBuf> {
    std::env::var_os("TCRT_RUNTIME_DIR").filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Invocation timeout fallback when `--timeout-ms` is not given.
///
/// `0` or an unparsable value means no timeout.
pub fn timeout() -> Option<Duration> {
    std::env::var("TCRT_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

/// `tracing` filter directive (default: `warn`).
pub fn log_filter() -> String {
    std::env::var("TCRT_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
