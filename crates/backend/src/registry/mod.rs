// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-side registries. Owned exclusively by the dispatcher task; no
//! locking anywhere in here.

mod projects;
mod translation_units;

pub use projects::{Project, Projects};
pub use translation_units::{TranslationUnit, TranslationUnits};

/// Everything the worker knows between commands.
#[derive(Default)]
pub struct Registry {
    pub projects: Projects,
    pub units: TranslationUnits,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}
