// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedder-side handle for a `scribed` worker.
//!
//! [`WorkerClient::start`] spawns a supervisor task that owns the worker
//! process and its socket. The embedder sends typed requests through the
//! handle and consumes replies as [`WorkerEvent`]s from the paired
//! receiver. When the worker stops answering, the supervisor finishes it
//! and brings up a fresh one; the embedder re-registers after every
//! [`WorkerEvent::ProcessRestarted`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod config;
mod env;
mod error;
mod supervisor;

pub use config::{find_worker_binary, WorkerConfig};
pub use error::ClientError;
pub use supervisor::{WorkerClient, WorkerEvent};
