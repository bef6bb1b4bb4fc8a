// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! scribe-backend: the out-of-process code completion worker.
//!
//! The binary (`scribed`) binds a Unix socket, accepts client
//! connections, and serves registration and completion commands from a
//! single dispatcher task that owns all worker state.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod completion;
pub mod dispatcher;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod logging;
pub mod registry;
