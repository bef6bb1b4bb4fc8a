// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol between the code completion client and its worker process.
//!
//! Wire format: 4-byte length prefix (big-endian) + payload. The payload
//! carries a per-direction message counter followed by a tagged command.
//! Every field has a fixed position and width; there is no self-describing
//! metadata on the wire.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod command;
mod completion;
mod container;
mod wire;

pub use command::{Command, CompleteCode};
pub use completion::{Availability, CodeCompletion, CompletionKind};
pub use container::{FileContainer, ProjectContainer};
pub use wire::{
    decode, encode, read_command, read_frame, write_command, write_frame, ProtocolError,
    MAX_FRAME_LEN,
};
