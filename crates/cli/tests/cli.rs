// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end checks of the `tcrt` binary against real launcher scripts.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

fn runtime_with_script(body: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tcruntime-instance.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    dir
}

/// `tcrt` with a clean environment and an explicit runtime directory.
fn tcrt(runtime_dir: &Path) -> Command {
    let mut cmd = bare_tcrt();
    cmd.arg("--runtime-dir").arg(runtime_dir);
    cmd
}

fn bare_tcrt() -> Command {
    let mut cmd = Command::cargo_bin("tcrt").unwrap();
    cmd.env_remove("TCRT_RUNTIME_DIR").env_remove("TCRT_TIMEOUT_MS").env_remove("TCRT_LOG");
    cmd
}

#[test]
#[serial]
fn version_prints_script_output() {
    let dir = runtime_with_script(
        r#"[ "$1" = "version" ] && echo "Server version: 8.5.0"
exit 0"#,
    );

    tcrt(dir.path()).arg("version").assert().success().stdout("Server version: 8.5.0\n");
}

#[test]
#[serial]
fn exit_code_is_propagated_silently() {
    let dir = runtime_with_script("echo stopping\nexit 3");

    tcrt(dir.path())
        .arg("stop")
        .assert()
        .code(3)
        .stdout("stopping\n")
        .stderr(predicate::str::contains("tcrt:").not());
}

#[test]
#[serial]
fn stderr_lines_are_mirrored_to_stderr() {
    let dir = runtime_with_script("echo running\necho 'port 8080 in use' >&2\nexit 1");

    tcrt(dir.path())
        .arg("start")
        .assert()
        .code(1)
        .stdout("running\n")
        .stderr(predicate::str::contains("port 8080 in use"));
}

#[test]
#[serial]
fn exec_passes_raw_arguments() {
    let dir = runtime_with_script(r#"printf '%s\n' "$@""#);

    tcrt(dir.path())
        .args(["exec", "create", "inst1", "-t", "nio"])
        .assert()
        .success()
        .stdout("create\ninst1\n-t\nnio\n");
}

#[test]
#[serial]
fn action_subcommands_forward_extra_arguments() {
    let dir = runtime_with_script(r#"printf '%s\n' "$@""#);

    tcrt(dir.path())
        .args(["run", "--debug"])
        .assert()
        .success()
        .stdout("run\n--debug\n");
}

#[test]
#[serial]
fn path_prints_resolved_script_without_running() {
    let dir = tempfile::tempdir().unwrap();
    let expected = format!("{}\n", dir.path().join("tcruntime-instance.sh").display());

    tcrt(dir.path()).arg("path").assert().success().stdout(predicate::str::diff(expected));
}

#[test]
#[serial]
fn runtime_dir_falls_back_to_environment() {
    let dir = runtime_with_script("echo from-env");

    bare_tcrt()
        .env("TCRT_RUNTIME_DIR", dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout("from-env\n");
}

#[test]
#[serial]
fn runtime_dir_defaults_to_current_directory() {
    let dir = runtime_with_script("echo from-cwd");

    bare_tcrt().current_dir(dir.path()).arg("status").assert().success().stdout("from-cwd\n");
}

#[test]
#[serial]
fn missing_script_exits_127() {
    let dir = tempfile::tempdir().unwrap();

    tcrt(dir.path())
        .arg("start")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("failed to spawn"));
}

#[test]
#[serial]
fn timeout_exits_124() {
    let dir = runtime_with_script("echo waiting\nexec sleep 5");

    tcrt(dir.path())
        .args(["--timeout-ms", "300", "run"])
        .assert()
        .code(124)
        .stdout("waiting\n")
        .stderr(predicate::str::contains("did not exit within 300ms"));
}

#[test]
#[serial]
fn quiet_prints_transcript_once_at_exit() {
    let dir = runtime_with_script("echo first\necho second >&2\necho third");

    let output = tcrt(dir.path()).args(["--quiet", "status"]).assert().success();
    let output = output.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(stdout.lines().count(), 3, "stdout: {stdout}");
    for line in ["first", "second", "third"] {
        assert!(stdout.lines().any(|l| l == line), "missing {line}: {stdout}");
    }
    assert!(!stderr.contains("second"), "stderr: {stderr}");
}

#[test]
#[serial]
fn unknown_subcommand_is_rejected() {
    bare_tcrt().arg("reload").assert().failure().stderr(predicate::str::contains("reload"));
}

#[test]
#[serial]
fn zero_timeout_flag_is_rejected() {
    let dir = runtime_with_script("echo never");

    tcrt(dir.path())
        .args(["--timeout-ms", "0", "status"])
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("--timeout-ms"));
}

#[test]
#[serial]
fn zero_timeout_from_environment_means_no_timeout() {
    let dir = runtime_with_script("sleep 0.2\necho done");

    tcrt(dir.path())
        .env("TCRT_TIMEOUT_MS", "0")
        .arg("status")
        .assert()
        .success()
        .stdout("done\n");
}
