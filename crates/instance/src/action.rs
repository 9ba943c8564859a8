// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Verbs understood by the launcher script.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Lifecycle verb passed as the first launcher argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceAction {
    Start,
    Stop,
    Restart,
    /// Run in the foreground until interrupted.
    Run,
    Status,
    Version,
}

impl InstanceAction {
    pub const ALL: [InstanceAction; 6] = [
        InstanceAction::Start,
        InstanceAction::Stop,
        InstanceAction::Restart,
        InstanceAction::Run,
        InstanceAction::Status,
        InstanceAction::Version,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceAction::Start => "start",
            InstanceAction::Stop => "stop",
            InstanceAction::Restart => "restart",
            InstanceAction::Run => "run",
            InstanceAction::Status => "status",
            InstanceAction::Version => "version",
        }
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown instance action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for InstanceAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstanceAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
