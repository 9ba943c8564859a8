// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs the launcher script of one runtime directory and tees its output.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinError;
use tracing::Instrument;

use crate::action::InstanceAction;
use crate::error::CommandError;
use crate::platform::{resolve_script, Platform};
use crate::sink::{CaptureBuffer, FanOut, LineSink, OutputStream, StdStreamSink};

/// Command object bound to the launcher script of a single runtime directory.
///
/// Every line the script prints goes to two places: the mirror sink of its
/// stream (this process's stdout/stderr unless replaced) and a capture buffer
/// that accumulates across invocations and is never reset.
///
/// Invocations are serial; `execute` takes `&mut self`.
pub struct ServerInstanceCommand {
    script: PathBuf,
    platform: Platform,
    capture: CaptureBuffer,
    stdout_sink: Arc<dyn LineSink>,
    stderr_sink: Arc<dyn LineSink>,
    timeout: Option<Duration>,
    last_exit_code: Option<i32>,
}

impl ServerInstanceCommand {
    /// Command for the host platform's script in `runtime_dir`.
    ///
    /// The directory is not checked; a missing script surfaces on `execute`.
    pub fn new(runtime_dir: impl AsRef<Path>) -> Self {
        Self::for_platform(runtime_dir, Platform::host())
    }

    pub fn for_platform(runtime_dir: impl AsRef<Path>, platform: Platform) -> Self {
        Self {
            script: resolve_script(runtime_dir.as_ref(), platform),
            platform,
            capture: CaptureBuffer::new(),
            stdout_sink: Arc::new(StdStreamSink::stdout()),
            stderr_sink: Arc::new(StdStreamSink::stderr()),
            timeout: None,
            last_exit_code: None,
        }
    }

    /// Replace the live mirror for the child's stdout.
    pub fn with_stdout_sink(mut self, sink: impl LineSink + 'static) -> Self {
        self.stdout_sink = Arc::new(sink);
        self
    }

    /// Replace the live mirror for the child's stderr.
    pub fn with_stderr_sink(mut self, sink: impl LineSink + 'static) -> Self {
        self.stderr_sink = Arc::new(sink);
        self
    }

    /// Kill the script and fail with [`CommandError::TimedOut`] if it runs
    /// longer than `timeout`. Without one, `execute` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script
    }

    /// Working directory of every invocation.
    pub fn runtime_dir(&self) -> &Path {
        self.script.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Everything captured so far, across all invocations.
    pub fn output(&self) -> String {
        self.capture.contents()
    }

    /// Exit code of the most recent invocation that ran to completion.
    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    /// Run the script with `args` and return its exit code.
    ///
    /// A non-zero exit code is returned as data. Errors mean the script could
    /// not be run to completion.
    pub async fn execute<I, S>(&mut self, args: I) -> Result<i32, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let span = tracing::info_span!(
            "instance.cmd",
            script = %self.script.display(),
            args = ?args,
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        let start = Instant::now();
        let exit_code = self.run(&args).instrument(span.clone()).await?;

        span.record("exit_code", exit_code);
        span.record("duration_ms", start.elapsed().as_millis() as u64);
        self.last_exit_code = Some(exit_code);
        Ok(exit_code)
    }

    /// Run `<script> <action> <extra...>`.
    pub async fn execute_action<I, S>(
        &mut self,
        action: InstanceAction,
        extra: I,
    ) -> Result<i32, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = std::iter::once(OsString::from(action.as_str()))
            .chain(extra.into_iter().map(|a| a.as_ref().to_os_string()))
            .collect();
        self.execute(args).await
    }

    /// [`execute`](Self::execute) on a private current-thread runtime.
    ///
    /// Fails with [`CommandError::Runtime`] when called from inside a Tokio
    /// runtime; async callers use `execute` directly.
    pub fn execute_blocking<I, S>(&mut self, args: I) -> Result<i32, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(CommandError::Runtime(std::io::Error::other(
                "execute_blocking called inside a Tokio runtime",
            )));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CommandError::Runtime)?;
        runtime.block_on(self.execute(args))
    }

    // -----------------------------------------------------------------------
    // Process plumbing
    // -----------------------------------------------------------------------

    async fn run(&self, args: &[OsString]) -> Result<i32, CommandError> {
        let mut process = Command::new(&self.script);
        process
            .args(args)
            .current_dir(self.runtime_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = process
            .spawn()
            .map_err(|source| CommandError::SpawnFailed { script: self.script.clone(), source })?;
        tracing::debug!(pid = child.id(), "launcher script spawned");

        let stdout = child.stdout.take().ok_or_else(|| self.missing_pipe(OutputStream::Stdout))?;
        let stderr = child.stderr.take().ok_or_else(|| self.missing_pipe(OutputStream::Stderr))?;

        // Both pipes drain while we wait; reading only one can wedge a child
        // that blocks writing the other.
        let mut stdout_task =
            tokio::spawn(drain(stdout, self.tee(OutputStream::Stdout)).in_current_span());
        let mut stderr_task =
            tokio::spawn(drain(stderr, self.tee(OutputStream::Stderr)).in_current_span());

        let completion = async { tokio::join!(child.wait(), &mut stdout_task, &mut stderr_task) };
        let finished = match self.timeout {
            None => Some(completion.await),
            Some(timeout) => tokio::time::timeout(timeout, completion).await.ok(),
        };

        let Some((status, stdout_lines, stderr_lines)) = finished else {
            stdout_task.abort();
            stderr_task.abort();
            self.kill(&mut child).await;
            let timeout = self.timeout.unwrap_or_default();
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "launcher script timed out");
            return Err(CommandError::TimedOut { script: self.script.clone(), timeout });
        };

        let status = status
            .map_err(|source| CommandError::WaitFailed { script: self.script.clone(), source })?;
        let stdout_lines = self.drained(OutputStream::Stdout, stdout_lines)?;
        let stderr_lines = self.drained(OutputStream::Stderr, stderr_lines)?;

        let exit_code = exit_code(status);
        tracing::info!(exit_code, stdout_lines, stderr_lines, "launcher script exited");
        Ok(exit_code)
    }

    /// Mirror sink for `stream` plus the shared capture buffer.
    fn tee(&self, stream: OutputStream) -> FanOut {
        let mirror = match stream {
            OutputStream::Stdout => Arc::clone(&self.stdout_sink),
            OutputStream::Stderr => Arc::clone(&self.stderr_sink),
        };
        FanOut::new(vec![mirror, Arc::new(self.capture.clone()) as Arc<dyn LineSink>])
    }

    fn drained(
        &self,
        stream: OutputStream,
        joined: Result<std::io::Result<usize>, JoinError>,
    ) -> Result<usize, CommandError> {
        match joined {
            Ok(Ok(lines)) => Ok(lines),
            Ok(Err(source)) => {
                Err(CommandError::StreamFailed { script: self.script.clone(), stream, source })
            }
            Err(e) => {
                tracing::warn!(%stream, error = %e, "drain task did not finish");
                Err(CommandError::Interrupted { script: self.script.clone(), stream })
            }
        }
    }

    fn missing_pipe(&self, stream: OutputStream) -> CommandError {
        CommandError::StreamFailed {
            script: self.script.clone(),
            stream,
            source: std::io::Error::other("pipe was not captured"),
        }
    }

    async fn kill(&self, child: &mut Child) {
        if let Err(e) = child.kill().await {
            tracing::warn!(error = %e, "failed to kill launcher script");
        }
    }
}

impl fmt::Display for ServerInstanceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.script.display())
    }
}

impl fmt::Debug for ServerInstanceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerInstanceCommand")
            .field("script", &self.script)
            .field("platform", &self.platform)
            .field("timeout", &self.timeout)
            .field("last_exit_code", &self.last_exit_code)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read `reader` to end-of-stream, handing each line to `sink`.
///
/// Returns the number of lines delivered. A final line without a terminator
/// is still delivered.
async fn drain<R>(reader: R, sink: FanOut) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    let mut lines = 0;
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            return Ok(lines);
        }
        sink.accept(&decode_line(&raw));
        lines += 1;
    }
}

/// Strip `\n` or `\r\n` and decode lossily.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

/// Exit code, or `128 + signal` for a child killed by a signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
