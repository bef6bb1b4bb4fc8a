// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace integration specs.
//!
//! Each spec boots the real `scribed` binary in a private sandbox
//! directory and drives it end to end through `scribe-client`.

mod prelude;

mod completion;
mod lifecycle;
mod registration;
mod session;
