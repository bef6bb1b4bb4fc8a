// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw candidate to wire completion mapping.

use scribe_ipc::{Availability, CodeCompletion, CompletionKind};

use super::{RawAvailability, RawCandidate, RawCategory};

// Added on top of the category base when the candidate cannot be
// reached from the request site.
const NOT_ACCESSIBLE_PENALTY: u32 = 2;

/// Lazily converts raw frontend candidates into wire completions.
pub struct CompletionExtractor {
    candidates: Vec<RawCandidate>,
    pos: usize,
}

impl CompletionExtractor {
    pub fn new(candidates: Vec<RawCandidate>) -> Self {
        Self { candidates, pos: 0 }
    }

    /// Whether a candidate with this insertion text is still ahead of
    /// the cursor. Does not consume anything.
    pub fn peek(&self, text: &str) -> bool {
        self.candidates[self.pos..].iter().any(|c| c.name == text)
    }

    /// Extract the first remaining candidate with this insertion text,
    /// without consuming it.
    pub fn find(&self, text: &str) -> Option<CodeCompletion> {
        self.candidates[self.pos..].iter().find(|c| c.name == text).map(extract)
    }
}

impl Iterator for CompletionExtractor {
    type Item = CodeCompletion;

    fn next(&mut self) -> Option<CodeCompletion> {
        let candidate = self.candidates.get(self.pos)?;
        self.pos += 1;
        Some(extract(candidate))
    }
}

fn extract(candidate: &RawCandidate) -> CodeCompletion {
    let mut priority = base_priority(candidate.category);
    if candidate.availability == RawAvailability::NotAccessible {
        priority += NOT_ACCESSIBLE_PENALTY;
    }
    CodeCompletion {
        text: candidate.name.clone(),
        hint: candidate.hint.clone(),
        snippet: candidate.snippet.clone(),
        priority,
        kind: kind(candidate.category),
        availability: availability(candidate.availability),
        has_parameters: !candidate.parameters.is_empty(),
    }
}

/// Collapse the frontend category onto the wire kind. Function macros
/// complete like functions and code patterns like keywords.
fn kind(category: RawCategory) -> CompletionKind {
    match category {
        RawCategory::FreeFunction | RawCategory::Method | RawCategory::FunctionMacro => {
            CompletionKind::Function
        }
        RawCategory::FunctionTemplate => CompletionKind::TemplateFunction,
        RawCategory::LocalVariable
        | RawCategory::Parameter
        | RawCategory::Field
        | RawCategory::NonTypeTemplateParameter => CompletionKind::Variable,
        RawCategory::Class
        | RawCategory::Struct
        | RawCategory::Union
        | RawCategory::TemplateTypeParameter => CompletionKind::Class,
        RawCategory::ClassTemplate
        | RawCategory::ClassTemplatePartialSpecialization
        | RawCategory::TemplateTemplateParameter => CompletionKind::TemplateClass,
        RawCategory::Namespace | RawCategory::NamespaceAlias => CompletionKind::Namespace,
        RawCategory::Enum => CompletionKind::Enumeration,
        RawCategory::EnumConstant => CompletionKind::Enumerator,
        RawCategory::Constructor => CompletionKind::Constructor,
        RawCategory::Destructor => CompletionKind::Destructor,
        RawCategory::Slot => CompletionKind::Slot,
        RawCategory::Signal => CompletionKind::Signal,
        RawCategory::MacroDefinition => CompletionKind::PreProcessor,
        RawCategory::Keyword | RawCategory::CodePattern => CompletionKind::Keyword,
    }
}

/// Fixed per-category base priority; lower is better. Locals, members,
/// and template parameters rank ahead of types, which rank ahead of
/// macros and namespaces.
fn base_priority(category: RawCategory) -> u32 {
    match category {
        RawCategory::Method
        | RawCategory::LocalVariable
        | RawCategory::Parameter
        | RawCategory::NonTypeTemplateParameter
        | RawCategory::TemplateTypeParameter
        | RawCategory::TemplateTemplateParameter
        | RawCategory::Destructor
        | RawCategory::Slot
        | RawCategory::Signal => 34,
        RawCategory::Field => 35,
        RawCategory::CodePattern => 40,
        RawCategory::FreeFunction
        | RawCategory::FunctionTemplate
        | RawCategory::Class
        | RawCategory::Struct
        | RawCategory::Union
        | RawCategory::ClassTemplate
        | RawCategory::ClassTemplatePartialSpecialization
        | RawCategory::Enum
        | RawCategory::Constructor
        | RawCategory::Keyword => 50,
        RawCategory::EnumConstant => 65,
        RawCategory::MacroDefinition | RawCategory::FunctionMacro => 70,
        RawCategory::Namespace | RawCategory::NamespaceAlias => 75,
    }
}

fn availability(raw: RawAvailability) -> Availability {
    match raw {
        RawAvailability::Available => Availability::Available,
        RawAvailability::Deprecated => Availability::Deprecated,
        RawAvailability::NotAvailable => Availability::NotAvailable,
        RawAvailability::NotAccessible => Availability::NotAccessible,
    }
}

/// Order results for the reply: lower priority value first, then more
/// usable availability. The sort is stable, so candidates the frontend
/// reported earlier stay ahead within a tie.
pub fn rank_completions(completions: &mut [CodeCompletion]) {
    completions.sort_by_key(|c| (c.priority, c.availability.rank()));
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
