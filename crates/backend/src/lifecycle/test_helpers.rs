// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tempfile::TempDir;

use super::Config;

/// A config rooted in a temp directory, shaped like `Config::load`
/// would build it without touching the real environment.
pub fn test_config(dir: &TempDir) -> Config {
    let state_dir = dir.path().to_path_buf();
    let socket_path = state_dir.join("scribed.sock");
    Config {
        lock_path: state_dir.join("scribed.sock.pid"),
        version_path: state_dir.join("scribed.sock.version"),
        log_path: state_dir.join("scribed.log"),
        socket_path,
        state_dir,
    }
}
