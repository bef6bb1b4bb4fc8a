// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registered projects, keyed by project file path.

use indexmap::IndexMap;
use scribe_ipc::ProjectContainer;

/// Compile arguments and change stamp for one registered project.
#[derive(Debug, Clone)]
pub struct Project {
    arguments: Vec<String>,
    last_change_ms: u64,
}

impl Project {
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn last_change_ms(&self) -> u64 {
        self.last_change_ms
    }
}

#[derive(Default)]
pub struct Projects {
    entries: IndexMap<String, Project>,
}

impl Projects {
    /// Register or update a project. Arguments are replaced wholesale,
    /// never merged. The change stamp is strictly monotonic per project
    /// even when the clock has not advanced between updates.
    pub fn register(&mut self, container: ProjectContainer, now_ms: u64) {
        let previous = self.entries.get(&container.project_path).map(|p| p.last_change_ms);
        let last_change_ms = match previous {
            Some(prev) => now_ms.max(prev + 1),
            None => now_ms,
        };
        self.entries.insert(
            container.project_path,
            Project { arguments: container.arguments, last_change_ms },
        );
    }

    /// Remove the given projects. Returns the paths that were not
    /// registered, in request order; known paths are removed regardless.
    pub fn unregister(&mut self, paths: Vec<String>) -> Vec<String> {
        let mut unknown = Vec::new();
        for path in paths {
            if self.entries.shift_remove(&path).is_none() {
                unknown.push(path);
            }
        }
        unknown
    }

    pub fn get(&self, path: &str) -> Option<&Project> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
