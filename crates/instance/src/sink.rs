// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line sinks fed by the output drain tasks.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Receives child output one line at a time (without the line terminator).
///
/// Sinks are shared between the stdout and stderr drain tasks, so
/// implementations must tolerate concurrent calls.
pub trait LineSink: Send + Sync {
    fn accept(&self, line: &str);
}

impl<S: LineSink + ?Sized> LineSink for Arc<S> {
    fn accept(&self, line: &str) {
        (**self).accept(line)
    }
}

/// One of the two output streams of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mirrors lines to this process's own stdout or stderr.
///
/// Write failures (closed pipe, full disk) never fail the command; the first
/// one is logged and later ones are dropped silently.
pub struct StdStreamSink {
    stream: OutputStream,
    writer: Mutex<Box<dyn Write + Send>>,
    failed: AtomicBool,
}

impl StdStreamSink {
    pub fn new(stream: OutputStream) -> Self {
        let writer: Box<dyn Write + Send> = match stream {
            OutputStream::Stdout => Box::new(std::io::stdout()),
            OutputStream::Stderr => Box::new(std::io::stderr()),
        };
        Self::with_writer(stream, writer)
    }

    /// Sink labelled `stream` that writes to `writer` instead of the real stream.
    pub(crate) fn with_writer(stream: OutputStream, writer: Box<dyn Write + Send>) -> Self {
        Self { stream, writer: Mutex::new(writer), failed: AtomicBool::new(false) }
    }

    pub fn stdout() -> Self {
        Self::new(OutputStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(OutputStream::Stderr)
    }

    pub fn stream(&self) -> OutputStream {
        self.stream
    }

    fn write(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}

impl fmt::Debug for StdStreamSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdStreamSink")
            .field("stream", &self.stream)
            .field("failed", &self.failed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl LineSink for StdStreamSink {
    fn accept(&self, line: &str) {
        if let Err(e) = self.write(line) {
            if !self.failed.swap(true, Ordering::Relaxed) {
                tracing::warn!(stream = %self.stream, error = %e, "mirroring child output failed");
            }
        }
    }
}

/// Cumulative transcript of every line accepted, newline-terminated.
///
/// Clones share the same buffer. Appends are serialized by a mutex, so lines
/// from concurrent writers never interleave mid-line.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<String>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full transcript in the order lines were received.
    pub fn contents(&self) -> String {
        self.inner.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Number of captured lines.
    pub fn line_count(&self) -> usize {
        self.inner.lock().matches('\n').count()
    }
}

impl fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBuffer").field("lines", &self.line_count()).finish()
    }
}

impl LineSink for CaptureBuffer {
    fn accept(&self, line: &str) {
        let mut buffer = self.inner.lock();
        buffer.push_str(line);
        buffer.push('\n');
    }
}

/// Drops every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl LineSink for Discard {
    fn accept(&self, _line: &str) {}
}

/// Forwards each line to every wrapped sink, in order.
#[derive(Clone, Default)]
pub struct FanOut {
    sinks: Vec<Arc<dyn LineSink>>,
}

impl FanOut {
    pub fn new(sinks: Vec<Arc<dyn LineSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn LineSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut").field("sinks", &self.sinks.len()).finish()
    }
}

impl LineSink for FanOut {
    fn accept(&self, line: &str) {
        for sink in &self.sinks {
            sink.accept(line);
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
