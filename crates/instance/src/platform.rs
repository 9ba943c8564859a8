// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher script resolution.
//!
//! The script flavor is picked from the host path-separator convention, so
//! resolution stays a pure function of `(runtime_dir, separator)`.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Base name of the launcher script found in every runtime directory.
pub const SCRIPT_NAME: &str = "tcruntime-instance";

/// Operating-system family as far as launcher scripts are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Backslash separators mean Windows; everything else gets the shell script.
    pub fn from_separator(separator: char) -> Self {
        if separator == '\\' {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Platform of the running process.
    pub fn host() -> Self {
        Self::from_separator(MAIN_SEPARATOR)
    }

    pub fn script_suffix(self) -> &'static str {
        match self {
            Platform::Unix => ".sh",
            Platform::Windows => ".bat",
        }
    }

    /// File name of the launcher script, e.g. `tcruntime-instance.sh`.
    pub fn script_name(self) -> String {
        format!("{SCRIPT_NAME}{}", self.script_suffix())
    }
}

/// Script suffix for a given path-separator convention.
pub fn platform_suffix(separator: char) -> &'static str {
    Platform::from_separator(separator).script_suffix()
}

/// Absolute path of the launcher script inside `runtime_dir`.
///
/// Relative directories are anchored at the current working directory. The
/// directory is not required to exist.
pub fn resolve_script(runtime_dir: &Path, platform: Platform) -> PathBuf {
    let script = runtime_dir.join(platform.script_name());
    std::path::absolute(&script).unwrap_or(script)
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
