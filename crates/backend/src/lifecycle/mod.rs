// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle: startup, already-running detection, shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Worker configuration: the socket and the files that travel with it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/scribe)
    pub state_dir: PathBuf,
    /// Path to the Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to the worker log file
    pub log_path: PathBuf,
}

impl Config {
    /// Load configuration, optionally overriding the socket path.
    ///
    /// The lock and version files sit next to the socket so workers on
    /// distinct sockets never fight over one lock; the log stays in
    /// the state directory.
    pub fn load(socket_override: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let state_dir = crate::env::state_dir()?;
        let socket_path = socket_override.unwrap_or_else(|| state_dir.join("scribed.sock"));
        Ok(Self {
            lock_path: sibling(&socket_path, "pid"),
            version_path: sibling(&socket_path, "version"),
            log_path: state_dir.join("scribed.log"),
            socket_path,
            state_dir,
        })
    }
}

/// `<socket>.pid` next to `<socket>`, whatever the socket is named.
fn sibling(socket_path: &Path, extension: &str) -> PathBuf {
    let mut os = socket_path.as_os_str().to_os_string();
    os.push(".");
    os.push(extension);
    PathBuf::from(os)
}

/// Worker state during operation.
#[derive(Debug)]
pub struct WorkerState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

/// Result of startup: worker state plus the bound socket to serve.
#[derive(Debug)]
pub struct StartupResult {
    pub worker: WorkerState,
    pub listener: UnixListener,
}

impl WorkerState {
    /// Remove the socket, PID and version files. The lock itself is
    /// released when the state is dropped.
    pub fn shutdown(&mut self) {
        info!("Shutting down worker...");
        for path in
            [&self.config.socket_path, &self.config.lock_path, &self.config.version_path]
        {
            if path.exists() {
                if let Err(error) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), %error, "Failed to remove worker file");
                }
            }
        }
        info!("Worker shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: worker already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
