// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the client.

use std::path::PathBuf;
use std::time::Duration;

/// Socket the worker serves by default, under the same state directory
/// the worker resolves for itself: SCRIBE_STATE_DIR > XDG_STATE_HOME/scribe
/// > ~/.local/state/scribe
pub(crate) fn default_socket_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("scribed.sock"))
}

fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SCRIBE_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("scribe"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/scribe"))
}

/// How long one request/reply exchange may take before the client gives
/// up on it, e.g. the connect handshake. SCRIBE_IPC_TIMEOUT_MS overrides.
pub(crate) fn ipc_timeout() -> Duration {
    std::env::var("SCRIBE_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(5000))
}
