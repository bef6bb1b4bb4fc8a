// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion engine specs
//!
//! What the bundled scanner surfaces end to end: candidate kinds,
//! compile-argument gating, unsaved overlays, fallback lookup.

use crate::prelude::*;

#[tokio::test]
async fn scanner_kinds_and_keywords_reach_the_wire() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    let source = "\
class Widget {
public:
    Widget();
    int size() const;
};
int helper();
";
    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/widget.cpp",
            "/w/app.pro",
            source,
        )])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new("/w/widget.cpp", 6, 1, "/w/app.pro"))
        .await
        .unwrap();

    let completions = next_completions(&mut events).await;
    let kind_of = |text: &str, kind: CompletionKind| {
        completions
            .iter()
            .any(|candidate| candidate.text == text && candidate.kind == kind)
    };
    assert!(kind_of("Widget", CompletionKind::Class));
    assert!(kind_of("Widget", CompletionKind::Constructor));
    assert!(kind_of("size", CompletionKind::Function));
    assert!(kind_of("helper", CompletionKind::Function));
    assert!(kind_of("return", CompletionKind::Keyword));
    let pattern = completions
        .iter()
        .find(|candidate| candidate.text == "switch")
        .expect("switch pattern");
    similar_asserts::assert_eq!(
        pattern.snippet,
        "switch (${1:expression}) {\ncase ${2:value}:\nbreak;\n}"
    );

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn compile_arguments_gate_conditional_declarations() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    let source = "\
#ifdef EXTRAS
int extra_call();
#endif
int always();
";
    client
        .register_projects(vec![
            ProjectContainer::new("/w/full.pro", vec!["-DEXTRAS".into()]),
            ProjectContainer::new("/w/lean.pro", vec![]),
        ])
        .await
        .unwrap();
    client
        .register_files(vec![
            FileContainer::with_unsaved_content("/w/api.cpp", "/w/full.pro", source),
            FileContainer::with_unsaved_content("/w/api.cpp", "/w/lean.pro", source),
        ])
        .await
        .unwrap();

    client
        .complete_code(CompleteCode::new("/w/api.cpp", 4, 1, "/w/full.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"extra_call".to_string()));
    assert!(texts.contains(&"always".to_string()));

    client
        .complete_code(CompleteCode::new("/w/api.cpp", 4, 1, "/w/lean.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(!texts.contains(&"extra_call".to_string()));
    assert!(texts.contains(&"always".to_string()));

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn unsaved_overlay_shadows_and_restores_disk_content() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    let path = sandbox.source_file("model.cpp", "int on_disk();\n");

    client
        .register_files(vec![FileContainer::new(path.as_str(), "/w/app.pro")])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new(path.as_str(), 1, 1, "/w/app.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"on_disk".to_string()));

    // The overlay takes effect on the very next request.
    client
        .register_files(vec![FileContainer::with_unsaved_content(
            path.as_str(),
            "/w/app.pro",
            "int in_memory();\n",
        )])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new(path.as_str(), 1, 1, "/w/app.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"in_memory".to_string()));
    assert!(!texts.contains(&"on_disk".to_string()));

    // Dropping the overlay goes back to what the disk says.
    client
        .register_files(vec![FileContainer::new(path.as_str(), "/w/app.pro")])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new(path.as_str(), 1, 1, "/w/app.pro"))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"on_disk".to_string()));
    assert!(!texts.contains(&"in_memory".to_string()));

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn empty_project_requests_fall_back_to_any_unit_for_the_file() {
    let sandbox = Sandbox::new();
    let (client, mut events) = sandbox.start().await;

    let source = "\
#ifdef GATED
int gated_sym;
#endif
int plain;
";
    client
        .register_projects(vec![ProjectContainer::new(
            "/w/app.pro",
            vec!["-DGATED".into()],
        )])
        .await
        .unwrap();
    client
        .register_files(vec![FileContainer::with_unsaved_content(
            "/w/shared.cpp",
            "/w/app.pro",
            source,
        )])
        .await
        .unwrap();

    // Empty project path: the lookup falls back to the unit registered
    // under /w/app.pro and completes with that project's arguments.
    client
        .complete_code(CompleteCode::new("/w/shared.cpp", 4, 1, ""))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(texts.contains(&"gated_sym".to_string()));
    assert!(texts.contains(&"plain".to_string()));

    // Unregistering the project does not evict the unit; only its
    // arguments are gone.
    client
        .unregister_projects(vec!["/w/app.pro".into()])
        .await
        .unwrap();
    client
        .complete_code(CompleteCode::new("/w/shared.cpp", 4, 1, ""))
        .await
        .unwrap();
    let texts = completion_texts(&mut events).await;
    assert!(!texts.contains(&"gated_sym".to_string()));
    assert!(texts.contains(&"plain".to_string()));

    client.shutdown().await.unwrap();
}
