// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registration specs
//!
//! Registry behavior observable at the protocol level: silent success,
//! per-batch unknown reporting, wholesale replacement of arguments.

use crate::prelude::*;

const GATED_SOURCE: &str = "\
#ifdef FEATURE
int enabled_flag;
#endif
int base;
";

#[tokio::test]
async fn completing_an_unregistered_unit_reports_the_container() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client
        .complete_code(CompleteCode::new("/nowhere/missing.cpp", 1, 1, "/nowhere/p.pro"))
        .await
        .unwrap();

    assert_eq!(
        next_event(&mut events).await,
        WorkerEvent::TranslationUnitDoesNotExist(FileContainer::new(
            "/nowhere/missing.cpp",
            "/nowhere/p.pro"
        ))
    );

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn unregister_then_complete_reports_the_missing_unit() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/alpha.cpp",
            "/w/app.pro",
            "int alpha();\n",
        )])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new("/w/alpha.cpp", 1, 1, "/w/app.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"alpha".to_string()));

    // Removal is by (file, project) key; content plays no part.
    client
        .unregister_files(vec![FileContainer::new("/w/alpha.cpp", "/w/app.pro")])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new("/w/alpha.cpp", 1, 1, "/w/app.pro"))
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut events).await,
        WorkerEvent::TranslationUnitDoesNotExist(FileContainer::new("/w/alpha.cpp", "/w/app.pro"))
    );

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_entries_in_unregister_batches_are_reported() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client
        .register_projects(vec![ProjectContainer::new("/w/known.pro", vec![])])
        .await
        .unwrap();
    client
        .unregister_projects(vec!["/w/known.pro".into(), "/w/ghost.pro".into()])
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut events).await,
        WorkerEvent::ProjectsDoNotExist(vec!["/w/ghost.pro".into()])
    );

    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/a.cpp",
            "/w/app.pro",
            "int a;\n",
        )])
        .await
        .unwrap();
    client
        .unregister_files(vec![
            FileContainer::new("/w/a.cpp", "/w/app.pro"),
            FileContainer::new("/w/b.cpp", "/w/app.pro"),
        ])
        .await
        .unwrap();
    // One notification per unknown container; the known one went
    // silently.
    assert_eq!(
        next_event(&mut events).await,
        WorkerEvent::TranslationUnitDoesNotExist(FileContainer::new("/w/b.cpp", "/w/app.pro"))
    );

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn reregistering_a_project_replaces_arguments_wholesale() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    client
        .register_projects(vec![ProjectContainer::new(
            "/w/app.pro",
            vec!["-DFEATURE".into()],
        )])
        .await
        .unwrap();
    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/gated.cpp",
            "/w/app.pro",
            GATED_SOURCE,
        )])
        .await
        .unwrap();

    client
        .complete_code(CompleteCode::new("/w/gated.cpp", 4, 1, "/w/app.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"enabled_flag".to_string()));
    assert!(texts.contains(&"base".to_string()));

    // Re-registration swaps the argument set out entirely.
    client
        .register_projects(vec![ProjectContainer::new("/w/app.pro", vec![])])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new("/w/gated.cpp", 4, 1, "/w/app.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(!texts.contains(&"enabled_flag".to_string()));
    assert!(texts.contains(&"base".to_string()));

    client.shutdown().await.unwrap();
}
