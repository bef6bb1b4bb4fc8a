// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-threaded command dispatch. All connections feed one channel;
//! replies fan back out through the per-connection sender carried with
//! each command, so registry access never needs a lock.

use std::sync::Arc;

use scribe_core::Clock;
use scribe_ipc::{Command, CompleteCode, FileContainer};
use tokio::sync::{mpsc, Notify};
use tracing::{debug, info, warn};

use crate::completion::{
    rank_completions, CompletionExtractor, CompletionFrontend, FrontendRequest,
};
use crate::registry::Registry;

/// One decoded command plus the channel its replies travel back on.
pub struct Incoming {
    pub command: Command,
    pub reply_tx: mpsc::Sender<Command>,
}

/// What the dispatcher decided for one command.
pub enum Handled {
    Replies(Vec<Command>),
    Shutdown,
}

pub struct Dispatcher<C: Clock> {
    registry: Registry,
    frontend: Box<dyn CompletionFrontend>,
    clock: C,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(frontend: Box<dyn CompletionFrontend>, clock: C) -> Self {
        Self { registry: Registry::new(), frontend, clock }
    }

    /// Successful registrations are silent; only failures and
    /// completion results produce replies.
    pub fn handle(&mut self, command: Command) -> Handled {
        match command {
            Command::End => {
                info!("end command received, shutting down");
                Handled::Shutdown
            }
            Command::Echo(payload) => Handled::Replies(vec![Command::Echo(payload)]),
            Command::RegisterProjects(projects) => {
                let now_ms = self.clock.epoch_ms();
                let count = projects.len();
                for project in projects {
                    self.registry.projects.register(project, now_ms);
                }
                debug!(count, total = self.registry.projects.len(), "registered projects");
                Handled::Replies(Vec::new())
            }
            Command::UnregisterProjects(paths) => {
                let unknown = self.registry.projects.unregister(paths);
                if unknown.is_empty() {
                    Handled::Replies(Vec::new())
                } else {
                    Handled::Replies(vec![Command::ProjectsDoNotExist(unknown)])
                }
            }
            Command::RegisterFiles(files) => {
                let count = files.len();
                for file in files {
                    self.registry.units.register(file);
                }
                debug!(count, total = self.registry.units.len(), "registered translation units");
                Handled::Replies(Vec::new())
            }
            Command::UnregisterFiles(files) => Handled::Replies(
                self.registry
                    .units
                    .unregister(files)
                    .into_iter()
                    .map(Command::TranslationUnitDoesNotExist)
                    .collect(),
            ),
            Command::CompleteCode(request) => Handled::Replies(vec![self.complete(request)]),
            other => {
                // Reply-direction traffic is rejected at the connection
                // layer; anything that still lands here is dropped.
                warn!(command = other.name(), "ignoring reply-direction command");
                Handled::Replies(Vec::new())
            }
        }
    }

    /// Every request gets exactly one reply: completions on success, a
    /// missing-unit notice when the unit is unknown or unreadable.
    fn complete(&mut self, request: CompleteCode) -> Command {
        let Some(unit) = self.registry.units.find(&request.file_path, &request.project_path)
        else {
            debug!(file = %request.file_path, "completion for unknown translation unit");
            return missing_unit(&request);
        };
        let source = match unit.source_text() {
            Ok(source) => source,
            Err(error) => {
                warn!(file = %request.file_path, %error, "failed to read translation unit");
                return missing_unit(&request);
            }
        };
        let arguments = self
            .registry
            .projects
            .get(unit.project_path())
            .map(|project| project.arguments().to_vec())
            .unwrap_or_default();
        let frontend_request = FrontendRequest {
            file_path: unit.file_path(),
            line: request.line,
            column: request.column,
            source: &source,
            arguments: &arguments,
        };
        match self.frontend.complete(&frontend_request) {
            Ok(candidates) => {
                let mut completions: Vec<_> = CompletionExtractor::new(candidates).collect();
                rank_completions(&mut completions);
                debug!(file = %request.file_path, count = completions.len(), "completed code");
                Command::CodeCompleted(completions)
            }
            Err(error) => {
                warn!(file = %request.file_path, %error, "frontend failed");
                missing_unit(&request)
            }
        }
    }
}

fn missing_unit(request: &CompleteCode) -> Command {
    Command::TranslationUnitDoesNotExist(FileContainer::new(
        request.file_path.clone(),
        request.project_path.clone(),
    ))
}

/// Drains the dispatch channel until an End command arrives or every
/// sender is gone. Replies to closed connections are dropped silently.
pub async fn run<C: Clock>(
    mut dispatcher: Dispatcher<C>,
    mut rx: mpsc::Receiver<Incoming>,
    shutdown: Arc<Notify>,
) {
    while let Some(incoming) = rx.recv().await {
        let name = incoming.command.name();
        match dispatcher.handle(incoming.command) {
            Handled::Replies(replies) => {
                for reply in replies {
                    if incoming.reply_tx.send(reply).await.is_err() {
                        debug!(command = name, "connection closed before reply was sent");
                        break;
                    }
                }
            }
            Handled::Shutdown => {
                shutdown.notify_one();
                return;
            }
        }
    }
    debug!("dispatch channel closed");
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
