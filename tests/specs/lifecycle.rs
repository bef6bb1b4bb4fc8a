// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle specs
//!
//! Instance files, the single-instance lock, and log placement for a
//! real worker process.

use crate::prelude::*;

#[tokio::test]
async fn instance_files_appear_beside_the_socket_and_leave_with_it() {
    let sandbox = Sandbox::new();
    let (client, _events) = sandbox.start().await;

    let pid_file = sandbox.path().join("scribed.sock.pid");
    let version_file = sandbox.path().join("scribed.sock.version");
    assert!(pid_file.exists(), "pid file should sit beside the socket");
    assert!(version_file.exists(), "version file should sit beside the socket");

    let pid: u32 = std::fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .expect("pid file holds a pid");
    assert!(pid > 0);
    let version = std::fs::read_to_string(&version_file).unwrap();
    assert_eq!(version.trim(), env!("CARGO_PKG_VERSION"));

    client.shutdown().await.unwrap();
    let cleaned = wait_for(SPEC_WAIT_MAX_MS, || {
        !pid_file.exists() && !sandbox.socket_path().exists()
    })
    .await;
    assert!(cleaned, "worker should remove socket and instance files on shutdown");
}

#[tokio::test]
#[serial_test::serial]
async fn a_second_worker_on_the_same_socket_reports_the_incumbent() {
    let sandbox = Sandbox::new();
    let (client, _events) = sandbox.start().await;

    let output = std::process::Command::new(scribed_binary())
        .arg(sandbox.socket_path())
        .env("SCRIBE_STATE_DIR", shared_state_dir())
        .output()
        .expect("run second worker");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("scribed is already running"),
        "stderr was: {stderr}"
    );
    assert!(stderr.contains("pid:"), "stderr was: {stderr}");
    assert!(stderr.contains("version:"), "stderr was: {stderr}");

    // The loser must not have disturbed the incumbent's files.
    assert!(sandbox.path().join("scribed.sock.pid").exists());

    client.shutdown().await.unwrap();
}

#[tokio::test]
#[serial_test::serial]
async fn the_worker_logs_into_the_state_directory() {
    let sandbox = Sandbox::new();
    let (client, _events) = sandbox.start().await;
    client.shutdown().await.unwrap();

    let log = shared_state_dir().join("scribed.log");
    let logged = wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::metadata(&log)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false)
    })
    .await;
    assert!(logged, "worker should log under the state directory");
}
