// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tcrt-instance: runs the `tcruntime-instance` launcher script of a tc
//! Runtime installation and tees its output.

pub mod action;
pub mod command;
pub mod error;
pub mod platform;
pub mod sink;

pub use action::{InstanceAction, UnknownAction};
pub use command::ServerInstanceCommand;
pub use error::{CommandError, FailureKind};
pub use platform::{platform_suffix, resolve_script, Platform, SCRIPT_NAME};
pub use sink::{CaptureBuffer, Discard, FanOut, LineSink, OutputStream, StdStreamSink};
