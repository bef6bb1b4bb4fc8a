// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Code completion results and their classification enums.

use std::cmp::Ordering;

use crate::wire::{Decode, Encode, ProtocolError, Reader};

/// What kind of symbol a completion inserts. Ordinals are part of the
/// wire format and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CompletionKind {
    Function = 0,
    Variable = 1,
    Class = 2,
    Namespace = 3,
    Enumeration = 4,
    Enumerator = 5,
    Constructor = 6,
    Destructor = 7,
    Slot = 8,
    Signal = 9,
    PreProcessor = 10,
    Keyword = 11,
    TemplateFunction = 12,
    TemplateClass = 13,
    Other = 14,
}

impl CompletionKind {
    fn from_ordinal(value: u32) -> Result<Self, ProtocolError> {
        Ok(match value {
            0 => Self::Function,
            1 => Self::Variable,
            2 => Self::Class,
            3 => Self::Namespace,
            4 => Self::Enumeration,
            5 => Self::Enumerator,
            6 => Self::Constructor,
            7 => Self::Destructor,
            8 => Self::Slot,
            9 => Self::Signal,
            10 => Self::PreProcessor,
            11 => Self::Keyword,
            12 => Self::TemplateFunction,
            13 => Self::TemplateClass,
            14 => Self::Other,
            _ => {
                return Err(ProtocolError::UnknownOrdinal {
                    type_name: "CompletionKind",
                    value,
                })
            }
        })
    }
}

impl Encode for CompletionKind {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        (*self as u32).encode_into(buf);
    }
}

impl Decode for CompletionKind {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        Self::from_ordinal(u32::decode_from(reader)?)
    }
}

/// Whether a completion may actually be used at the request site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Availability {
    Available = 0,
    Deprecated = 1,
    NotAvailable = 2,
    NotAccessible = 3,
}

impl Availability {
    fn from_ordinal(value: u32) -> Result<Self, ProtocolError> {
        Ok(match value {
            0 => Self::Available,
            1 => Self::Deprecated,
            2 => Self::NotAvailable,
            3 => Self::NotAccessible,
            _ => {
                return Err(ProtocolError::UnknownOrdinal {
                    type_name: "Availability",
                    value,
                })
            }
        })
    }

    /// Rank used by result ordering: usable first, then warned, then
    /// inaccessible, then unusable.
    pub fn rank(self) -> u32 {
        match self {
            Self::Available => 0,
            Self::Deprecated => 1,
            Self::NotAccessible => 2,
            Self::NotAvailable => 3,
        }
    }
}

impl Encode for Availability {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        (*self as u32).encode_into(buf);
    }
}

impl Decode for Availability {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        Self::from_ordinal(u32::decode_from(reader)?)
    }
}

/// One completion candidate. Lower `priority` values are better.
///
/// Equality deliberately compares only `(text, kind)`; the remaining
/// fields are presentation detail that may differ between frontends
/// for what is the same candidate. Ordering follows the same key, with
/// `text` as the primary component.
#[derive(Debug, Clone)]
pub struct CodeCompletion {
    pub text: String,
    pub hint: String,
    pub snippet: String,
    pub priority: u32,
    pub kind: CompletionKind,
    pub availability: Availability,
    pub has_parameters: bool,
}

impl CodeCompletion {
    pub fn new(text: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            text: text.into(),
            hint: String::new(),
            snippet: String::new(),
            priority: 0,
            kind,
            availability: Availability::Available,
            has_parameters: false,
        }
    }
}

impl PartialEq for CodeCompletion {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.kind == other.kind
    }
}

impl Eq for CodeCompletion {}

impl Ord for CodeCompletion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text
            .cmp(&other.text)
            .then_with(|| (self.kind as u32).cmp(&(other.kind as u32)))
    }
}

impl PartialOrd for CodeCompletion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Encode for CodeCompletion {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.text.encode_into(buf);
        self.hint.encode_into(buf);
        self.snippet.encode_into(buf);
        self.priority.encode_into(buf);
        self.kind.encode_into(buf);
        self.availability.encode_into(buf);
        self.has_parameters.encode_into(buf);
    }
}

impl Decode for CodeCompletion {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            text: String::decode_from(reader)?,
            hint: String::decode_from(reader)?,
            snippet: String::decode_from(reader)?,
            priority: u32::decode_from(reader)?,
            kind: CompletionKind::decode_from(reader)?,
            availability: Availability::decode_from(reader)?,
            has_parameters: bool::decode_from(reader)?,
        })
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
