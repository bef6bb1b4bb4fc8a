// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side errors.

use std::path::PathBuf;

use scribe_ipc::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Failed to spawn worker {path}: {source}")]
    WorkerSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker did not accept a connection at {path} after {attempts} attempts")]
    ConnectFailed { path: PathBuf, attempts: usize },

    #[error("Worker did not answer the connect handshake")]
    HandshakeFailed,

    #[error("Not connected to a worker")]
    NotConnected,

    #[error("Supervisor task is gone")]
    SupervisorGone,

    #[error("Could not determine state directory (set SCRIBE_STATE_DIR, XDG_STATE_HOME, or HOME)")]
    NoStateDir,
}
