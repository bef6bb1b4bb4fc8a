// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command set carried over the channel, in both directions.

use crate::container::{FileContainer, ProjectContainer};
use crate::wire::{Decode, Encode, ProtocolError, Reader};
use crate::CodeCompletion;

const TAG_END: u8 = 0x00;
const TAG_ECHO: u8 = 0x01;
const TAG_REGISTER_PROJECTS: u8 = 0x02;
const TAG_UNREGISTER_PROJECTS: u8 = 0x03;
const TAG_REGISTER_FILES: u8 = 0x04;
const TAG_UNREGISTER_FILES: u8 = 0x05;
const TAG_COMPLETE_CODE: u8 = 0x06;
const TAG_CODE_COMPLETED: u8 = 0x07;
const TAG_PROJECTS_DO_NOT_EXIST: u8 = 0x08;
const TAG_TRANSLATION_UNIT_DOES_NOT_EXIST: u8 = 0x09;

/// A completion request position inside a registered translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteCode {
    pub file_path: String,
    pub line: u32,
    pub column: u32,
    pub project_path: String,
}

impl CompleteCode {
    pub fn new(
        file_path: impl Into<String>,
        line: u32,
        column: u32,
        project_path: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
            project_path: project_path.into(),
        }
    }
}

impl Encode for CompleteCode {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.file_path.encode_into(buf);
        self.line.encode_into(buf);
        self.column.encode_into(buf);
        self.project_path.encode_into(buf);
    }
}

impl Decode for CompleteCode {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            file_path: String::decode_from(reader)?,
            line: u32::decode_from(reader)?,
            column: u32::decode_from(reader)?,
            project_path: String::decode_from(reader)?,
        })
    }
}

/// Every message the channel can carry. Client→worker commands and
/// worker→client replies share one tag space so either side can decode
/// anything it receives and reject what it does not serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the worker to shut down.
    End,
    /// Round-trip probe; the worker answers with the identical command.
    Echo(Option<Box<Command>>),
    RegisterProjects(Vec<ProjectContainer>),
    UnregisterProjects(Vec<String>),
    RegisterFiles(Vec<FileContainer>),
    UnregisterFiles(Vec<FileContainer>),
    CompleteCode(CompleteCode),
    CodeCompleted(Vec<CodeCompletion>),
    ProjectsDoNotExist(Vec<String>),
    TranslationUnitDoesNotExist(FileContainer),
}

impl Command {
    /// Wire tag identifying the variant.
    pub fn tag(&self) -> u8 {
        match self {
            Command::End => TAG_END,
            Command::Echo(_) => TAG_ECHO,
            Command::RegisterProjects(_) => TAG_REGISTER_PROJECTS,
            Command::UnregisterProjects(_) => TAG_UNREGISTER_PROJECTS,
            Command::RegisterFiles(_) => TAG_REGISTER_FILES,
            Command::UnregisterFiles(_) => TAG_UNREGISTER_FILES,
            Command::CompleteCode(_) => TAG_COMPLETE_CODE,
            Command::CodeCompleted(_) => TAG_CODE_COMPLETED,
            Command::ProjectsDoNotExist(_) => TAG_PROJECTS_DO_NOT_EXIST,
            Command::TranslationUnitDoesNotExist(_) => TAG_TRANSLATION_UNIT_DOES_NOT_EXIST,
        }
    }

    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::End => "End",
            Command::Echo(_) => "Echo",
            Command::RegisterProjects(_) => "RegisterProjects",
            Command::UnregisterProjects(_) => "UnregisterProjects",
            Command::RegisterFiles(_) => "RegisterFiles",
            Command::UnregisterFiles(_) => "UnregisterFiles",
            Command::CompleteCode(_) => "CompleteCode",
            Command::CodeCompleted(_) => "CodeCompleted",
            Command::ProjectsDoNotExist(_) => "ProjectsDoNotExist",
            Command::TranslationUnitDoesNotExist(_) => "TranslationUnitDoesNotExist",
        }
    }

    /// True for commands the worker serves. Echo travels both ways.
    pub fn is_worker_bound(&self) -> bool {
        !matches!(
            self,
            Command::CodeCompleted(_)
                | Command::ProjectsDoNotExist(_)
                | Command::TranslationUnitDoesNotExist(_)
        )
    }

    /// True for replies the client consumes. Echo travels both ways.
    pub fn is_client_bound(&self) -> bool {
        matches!(
            self,
            Command::Echo(_)
                | Command::CodeCompleted(_)
                | Command::ProjectsDoNotExist(_)
                | Command::TranslationUnitDoesNotExist(_)
        )
    }
}

impl Encode for Command {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.tag());
        match self {
            Command::End => {}
            Command::Echo(payload) => {
                payload.is_some().encode_into(buf);
                if let Some(inner) = payload {
                    inner.encode_into(buf);
                }
            }
            Command::RegisterProjects(projects) => projects.encode_into(buf),
            Command::UnregisterProjects(paths) => paths.encode_into(buf),
            Command::RegisterFiles(files) => files.encode_into(buf),
            Command::UnregisterFiles(files) => files.encode_into(buf),
            Command::CompleteCode(request) => request.encode_into(buf),
            Command::CodeCompleted(completions) => completions.encode_into(buf),
            Command::ProjectsDoNotExist(paths) => paths.encode_into(buf),
            Command::TranslationUnitDoesNotExist(file) => file.encode_into(buf),
        }
    }
}

impl Decode for Command {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        let tag = reader.take(1)?[0];
        Ok(match tag {
            TAG_END => Command::End,
            TAG_ECHO => {
                let payload = if bool::decode_from(reader)? {
                    reader.enter_nested()?;
                    let inner = Command::decode_from(reader)?;
                    reader.exit_nested();
                    Some(Box::new(inner))
                } else {
                    None
                };
                Command::Echo(payload)
            }
            TAG_REGISTER_PROJECTS => Command::RegisterProjects(Vec::decode_from(reader)?),
            TAG_UNREGISTER_PROJECTS => Command::UnregisterProjects(Vec::decode_from(reader)?),
            TAG_REGISTER_FILES => Command::RegisterFiles(Vec::decode_from(reader)?),
            TAG_UNREGISTER_FILES => Command::UnregisterFiles(Vec::decode_from(reader)?),
            TAG_COMPLETE_CODE => Command::CompleteCode(CompleteCode::decode_from(reader)?),
            TAG_CODE_COMPLETED => Command::CodeCompleted(Vec::decode_from(reader)?),
            TAG_PROJECTS_DO_NOT_EXIST => Command::ProjectsDoNotExist(Vec::decode_from(reader)?),
            TAG_TRANSLATION_UNIT_DOES_NOT_EXIST => {
                Command::TranslationUnitDoesNotExist(FileContainer::decode_from(reader)?)
            }
            other => return Err(ProtocolError::UnknownCommandTag(other)),
        })
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
