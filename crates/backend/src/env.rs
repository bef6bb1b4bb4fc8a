// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the worker.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// Worker version (from Cargo.toml), written to the version file and
/// reported when a second instance refuses to start.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: SCRIBE_STATE_DIR > XDG_STATE_HOME/scribe >
/// ~/.local/state/scribe
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("SCRIBE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("scribe"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/scribe"))
}

/// Log filter directives, `tracing_subscriber::EnvFilter` syntax.
pub fn log_filter() -> String {
    std::env::var("SCRIBE_LOG").unwrap_or_else(|_| "info".to_string())
}
