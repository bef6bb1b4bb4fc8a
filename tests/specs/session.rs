// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker session specs
//!
//! Boot, complete, restart, and shutdown through the public client.

use crate::prelude::*;

const MODEL_SOURCE: &str = "\
int count();
void reset(int value);
";

#[tokio::test]
async fn a_live_worker_completes_from_registered_state() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client
        .register_projects(vec![ProjectContainer::new("/w/app.pro", vec![])])
        .await
        .unwrap();
    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/model.cpp",
            "/w/app.pro",
            MODEL_SOURCE,
        )])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new("/w/model.cpp", 3, 1, "/w/app.pro"))
        .await
        .unwrap();

    let completions = next_completions(&mut events).await;
    let count = completions
        .iter()
        .find(|candidate| candidate.text == "count")
        .expect("count candidate");
    assert_eq!(count.kind, CompletionKind::Function);
    assert!(!count.has_parameters);
    let reset = completions
        .iter()
        .find(|candidate| candidate.text == "reset")
        .expect("reset candidate");
    assert!(reset.has_parameters);

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn restart_announces_once_and_starts_empty() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/model.cpp",
            "/w/app.pro",
            MODEL_SOURCE,
        )])
        .await
        .unwrap();

    client.restart().await.expect("restart");
    assert_eq!(next_event(&mut events).await, WorkerEvent::ProcessRestarted);

    // The replacement knows nothing, and its reply is the very next
    // event: the restart was announced exactly once.
    client
        .complete_code(CompleteCode::new("/w/model.cpp", 1, 1, "/w/app.pro"))
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut events).await,
        WorkerEvent::TranslationUnitDoesNotExist(FileContainer::new("/w/model.cpp", "/w/app.pro"))
    );

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_is_idempotent_and_closes_the_event_stream() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client.shutdown().await.unwrap();
    client.shutdown().await.unwrap();

    let trailing = tokio::time::timeout(Duration::from_millis(SPEC_WAIT_MAX_MS), events.recv())
        .await
        .expect("event stream should settle");
    assert!(trailing.is_none());
    assert!(matches!(
        client.echo().await,
        Err(ClientError::SupervisorGone)
    ));
}
