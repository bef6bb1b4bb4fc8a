// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn file_container_new_has_no_unsaved_content() {
    let file = FileContainer::new("src/main.cpp", "project.pro");
    assert!(!file.has_unsaved_content);
    assert!(file.unsaved_content.is_empty());
}

#[test]
fn file_container_with_unsaved_content_sets_the_flag() {
    let file = FileContainer::with_unsaved_content("src/main.cpp", "project.pro", "int x;\n");
    assert!(file.has_unsaved_content);
    assert_eq!(file.unsaved_content, "int x;\n");
}

#[test]
fn project_container_keeps_argument_order() {
    let project =
        ProjectContainer::new("project.pro", vec!["-std=c++14".into(), "-DDEBUG".into()]);
    assert_eq!(project.arguments, ["-std=c++14", "-DDEBUG"]);
}
