// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration and worker binary discovery.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

/// How the supervisor runs and watches one worker process.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Worker executable to spawn.
    pub executable: PathBuf,
    /// Socket the worker serves, passed as its only argument.
    pub socket_path: PathBuf,
    /// How often the liveness check runs; a worker silent for longer
    /// than this is finished and respawned.
    pub liveness_interval: Duration,
    /// Connect attempts after spawning before giving up.
    pub connect_attempts: usize,
    /// Bound on a single connect attempt.
    pub connect_timeout: Duration,
    /// Pause between connect attempts.
    pub connect_retry_delay: Duration,
    /// Grace a finishing worker gets between SIGTERM and SIGKILL.
    pub finish_timeout: Duration,
}

impl WorkerConfig {
    pub fn new(executable: PathBuf, socket_path: PathBuf) -> Self {
        Self {
            executable,
            socket_path,
            liveness_interval: Duration::from_secs(10),
            connect_attempts: 1000,
            connect_timeout: Duration::from_millis(20),
            connect_retry_delay: Duration::from_millis(30),
            finish_timeout: Duration::from_secs(1),
        }
    }

    /// Discovered worker binary and the default socket location.
    pub fn discover() -> Result<Self, ClientError> {
        let socket_path = crate::env::default_socket_path().ok_or(ClientError::NoStateDir)?;
        Ok(Self::new(find_worker_binary(), socket_path))
    }
}

/// Locate the `scribed` binary to spawn.
pub fn find_worker_binary() -> PathBuf {
    let current_exe = std::env::current_exe().ok();

    // Only use CARGO_MANIFEST_DIR if the embedder itself is a debug build.
    // This prevents version mismatches when a release build inherits
    // CARGO_MANIFEST_DIR from a dev environment.
    let is_debug_build = current_exe
        .as_ref()
        .and_then(|p| p.to_str())
        .map(|s| s.contains("target/debug"))
        .unwrap_or(false);

    if is_debug_build {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let dev_path = PathBuf::from(manifest_dir)
                .parent()
                .and_then(|p| p.parent())
                .map(|p| p.join("target/debug/scribed"));
            if let Some(path) = dev_path {
                if path.exists() {
                    return path;
                }
            }
        }
    }

    // Check current executable's directory
    if let Some(ref exe) = current_exe {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("scribed");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    // Fall back to PATH lookup
    PathBuf::from("scribed")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
