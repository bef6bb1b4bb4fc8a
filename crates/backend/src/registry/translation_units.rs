// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registered translation units, keyed by (file path, project path).

use indexmap::IndexMap;
use scribe_ipc::FileContainer;

/// One registered translation unit, possibly carrying unsaved editor
/// content that shadows the file on disk.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    file_path: String,
    project_path: String,
    unsaved_content: Option<String>,
}

impl TranslationUnit {
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    pub fn has_unsaved_content(&self) -> bool {
        self.unsaved_content.is_some()
    }

    /// The text the completion engine should see: the unsaved overlay
    /// when present, the on-disk content otherwise.
    pub fn source_text(&self) -> std::io::Result<String> {
        match &self.unsaved_content {
            Some(content) => Ok(content.clone()),
            None => std::fs::read_to_string(&self.file_path),
        }
    }
}

#[derive(Default)]
pub struct TranslationUnits {
    entries: IndexMap<(String, String), TranslationUnit>,
}

impl TranslationUnits {
    /// Register or update a unit. A container with unsaved content
    /// installs the overlay; one without removes it. Project linkage is
    /// advisory, so the project does not have to be registered.
    pub fn register(&mut self, file: FileContainer) {
        let unsaved_content = file.has_unsaved_content.then_some(file.unsaved_content);
        self.entries.insert(
            (file.file_path.clone(), file.project_path.clone()),
            TranslationUnit {
                file_path: file.file_path,
                project_path: file.project_path,
                unsaved_content,
            },
        );
    }

    /// Remove the given units by exact key. Returns the containers that
    /// were not registered, in request order; known units are removed
    /// regardless.
    pub fn unregister(&mut self, files: Vec<FileContainer>) -> Vec<FileContainer> {
        let mut unknown = Vec::new();
        for file in files {
            let key = (file.file_path.clone(), file.project_path.clone());
            if self.entries.shift_remove(&key).is_none() {
                unknown.push(file);
            }
        }
        unknown
    }

    /// Look up a unit for a completion request. The exact key wins;
    /// when it misses and the requested project path is empty, the
    /// first unit registered for that file under any project is used.
    /// Removal never falls back this way.
    pub fn find(&self, file_path: &str, project_path: &str) -> Option<&TranslationUnit> {
        let key = (file_path.to_string(), project_path.to_string());
        if let Some(unit) = self.entries.get(&key) {
            return Some(unit);
        }
        if project_path.is_empty() {
            return self.entries.values().find(|unit| unit.file_path == file_path);
        }
        None
    }

    pub fn contains(&self, file_path: &str, project_path: &str) -> bool {
        self.entries.contains_key(&(file_path.to_string(), project_path.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "translation_units_tests.rs"]
mod tests;
