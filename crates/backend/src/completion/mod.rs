// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion engine: the frontend seam and raw-candidate extraction.
//!
//! A [`CompletionFrontend`] turns source text into [`RawCandidate`]s
//! with frontend-level categories. The [`CompletionExtractor`] maps
//! those to wire completions with deterministic kinds and priorities,
//! so every frontend ranks the same way.

mod extractor;
mod scan;

pub use extractor::{rank_completions, CompletionExtractor};
pub use scan::ScanFrontend;

/// What a frontend sees for one completion request. `source` is
/// overlay-aware: unsaved editor content when present, disk content
/// otherwise.
pub struct FrontendRequest<'a> {
    pub file_path: &'a str,
    pub line: u32,
    pub column: u32,
    pub source: &'a str,
    pub arguments: &'a [String],
}

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("Failed to parse {path}: {detail}")]
    ParseFailed { path: String, detail: String },
}

/// Produces raw candidates for a position in a translation unit.
///
/// Object safe; the dispatcher holds the active frontend behind a box.
/// A failure here means the unit could not be analyzed and surfaces to
/// the client as a missing translation unit, never as a dead worker.
pub trait CompletionFrontend: Send {
    fn complete(
        &mut self,
        request: &FrontendRequest<'_>,
    ) -> Result<Vec<RawCandidate>, FrontendError>;
}

/// Frontend-level classification, finer grained than the wire kind.
/// The extractor owns the collapse onto [`scribe_ipc::CompletionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawCategory {
    FreeFunction,
    Method,
    FunctionTemplate,
    FunctionMacro,
    LocalVariable,
    Parameter,
    Field,
    NonTypeTemplateParameter,
    Class,
    Struct,
    Union,
    TemplateTypeParameter,
    ClassTemplate,
    ClassTemplatePartialSpecialization,
    TemplateTemplateParameter,
    Namespace,
    NamespaceAlias,
    Enum,
    EnumConstant,
    Constructor,
    Destructor,
    Slot,
    Signal,
    MacroDefinition,
    Keyword,
    CodePattern,
}

/// Frontend-level availability, mapped one-to-one onto the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawAvailability {
    Available,
    Deprecated,
    NotAvailable,
    NotAccessible,
}

/// One candidate as reported by a frontend, before extraction.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub name: String,
    pub hint: String,
    pub snippet: String,
    pub category: RawCategory,
    pub availability: RawAvailability,
    pub parameters: Vec<String>,
}

impl RawCandidate {
    pub fn new(name: impl Into<String>, category: RawCategory) -> Self {
        Self {
            name: name.into(),
            hint: String::new(),
            snippet: String::new(),
            category,
            availability: RawAvailability::Available,
            parameters: Vec::new(),
        }
    }
}
