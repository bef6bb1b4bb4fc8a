// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the workspace specs.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use tokio::sync::mpsc;

pub use std::time::Duration;

pub use scribe_client::{ClientError, WorkerClient, WorkerConfig, WorkerEvent};
pub use scribe_ipc::{
    CodeCompletion, CompleteCode, CompletionKind, FileContainer, ProjectContainer,
};

pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

/// Path to the worker binary cargo built for this workspace.
pub fn scribed_binary() -> PathBuf {
    assert_cmd::cargo::cargo_bin("scribed")
}

/// All spec workers share one state directory for their logs; sockets
/// and instance files live in per-spec sandboxes.
pub fn shared_state_dir() -> &'static Path {
    static STATE_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    STATE_DIR
        .get_or_init(|| {
            let dir = tempfile::TempDir::new().expect("create shared state dir");
            std::env::set_var("SCRIBE_STATE_DIR", dir.path());
            dir
        })
        .path()
}

/// Private directory holding one worker's socket and instance files.
pub struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        shared_state_dir();
        Self {
            dir: tempfile::TempDir::new().expect("create sandbox dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn socket_path(&self) -> PathBuf {
        self.dir.path().join("scribed.sock")
    }

    pub fn config(&self) -> WorkerConfig {
        WorkerConfig::new(scribed_binary(), self.socket_path())
    }

    /// Boot a worker and wait until the channel is usable.
    pub async fn start(&self) -> (WorkerClient, mpsc::Receiver<WorkerEvent>) {
        let (client, events) = WorkerClient::start(self.config());
        wait_for_channel(&client).await;
        (client, events)
    }

    /// Write a source file on disk inside the sandbox; returns its path
    /// as the registry expects it.
    pub fn source_file(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write source file");
        path.to_string_lossy().into_owned()
    }
}

/// Block until the supervisor reports a usable channel.
pub async fn wait_for_channel(client: &WorkerClient) {
    let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS);
    loop {
        match client.echo().await {
            Ok(()) => return,
            Err(_) if Instant::now() < deadline => {
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            Err(error) => panic!("worker channel never came up: {error}"),
        }
    }
}

/// Next event, bounded so a hung worker fails the spec instead of the
/// whole harness.
pub async fn next_event(events: &mut mpsc::Receiver<WorkerEvent>) -> WorkerEvent {
    tokio::time::timeout(Duration::from_millis(SPEC_WAIT_MAX_MS), events.recv())
        .await
        .expect("timed out waiting for a worker event")
        .expect("worker event stream closed")
}

/// Completions from the next event; anything else fails the spec.
pub async fn next_completions(events: &mut mpsc::Receiver<WorkerEvent>) -> Vec<CodeCompletion> {
    match next_event(events).await {
        WorkerEvent::CodeCompleted(completions) => completions,
        other => panic!("expected completions, got {other:?}"),
    }
}

/// Candidate texts from the next completion reply.
pub async fn completion_texts(events: &mut mpsc::Receiver<WorkerEvent>) -> Vec<String> {
    next_completions(events)
        .await
        .into_iter()
        .map(|completion| completion.text)
        .collect()
}

/// Poll a condition until it holds or the budget runs out.
pub async fn wait_for(max_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    condition()
}
