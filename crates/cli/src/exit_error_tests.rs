// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;
use std::time::Duration;
use tcrt_instance::OutputStream;

fn script() -> PathBuf {
    PathBuf::from("/opt/tc/base/tcruntime-instance.sh")
}

#[test]
fn spawn_failure_uses_command_not_found_code() {
    let exit = ExitError::from(CommandError::SpawnFailed {
        script: script(),
        source: std::io::ErrorKind::NotFound.into(),
    });
    assert_eq!(exit.code, EXIT_SPAWN_FAILED);
    assert!(exit.message.starts_with("failed to spawn"), "{}", exit.message);
}

#[test]
fn timeout_uses_timeout_code() {
    let exit = ExitError::from(CommandError::TimedOut {
        script: script(),
        timeout: Duration::from_secs(1),
    });
    assert_eq!(exit.code, EXIT_TIMED_OUT);
}

#[test]
fn other_failures_exit_one() {
    let exit = ExitError::from(CommandError::Interrupted {
        script: script(),
        stream: OutputStream::Stdout,
    });
    assert_eq!(exit.code, 1);
}

#[test]
fn silent_has_no_message() {
    let exit = ExitError::silent(3);
    assert_eq!(exit.code, 3);
    assert_eq!(exit.to_string(), "");
}
