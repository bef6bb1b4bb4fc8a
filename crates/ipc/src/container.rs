// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data containers carried by registration commands.

use crate::wire::{Decode, Encode, ProtocolError, Reader};

/// A project and the compile arguments its translation units build with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContainer {
    pub project_path: String,
    pub arguments: Vec<String>,
}

impl ProjectContainer {
    pub fn new(project_path: impl Into<String>, arguments: Vec<String>) -> Self {
        Self { project_path: project_path.into(), arguments }
    }
}

impl Encode for ProjectContainer {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.project_path.encode_into(buf);
        self.arguments.encode_into(buf);
    }
}

impl Decode for ProjectContainer {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            project_path: String::decode_from(reader)?,
            arguments: Vec::decode_from(reader)?,
        })
    }
}

/// A translation unit, optionally carrying unsaved editor content that
/// overrides whatever is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContainer {
    pub file_path: String,
    pub project_path: String,
    pub unsaved_content: String,
    pub has_unsaved_content: bool,
}

impl FileContainer {
    pub fn new(file_path: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            project_path: project_path.into(),
            unsaved_content: String::new(),
            has_unsaved_content: false,
        }
    }

    pub fn with_unsaved_content(
        file_path: impl Into<String>,
        project_path: impl Into<String>,
        unsaved_content: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            project_path: project_path.into(),
            unsaved_content: unsaved_content.into(),
            has_unsaved_content: true,
        }
    }
}

impl Encode for FileContainer {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.file_path.encode_into(buf);
        self.project_path.encode_into(buf);
        self.unsaved_content.encode_into(buf);
        self.has_unsaved_content.encode_into(buf);
    }
}

impl Decode for FileContainer {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            file_path: String::decode_from(reader)?,
            project_path: String::decode_from(reader)?,
            unsaved_content: String::decode_from(reader)?,
            has_unsaved_content: bool::decode_from(reader)?,
        })
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
