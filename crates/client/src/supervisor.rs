// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker process supervision.
//!
//! One task owns the child process, the socket, and the liveness
//! deadline. [`WorkerClient`] handles forward typed requests to it over
//! a channel and receive per-request acks, so a send can fail fast with
//! [`ClientError::NotConnected`] instead of queueing against a dead
//! worker. Replies from the worker come back out of band as
//! [`WorkerEvent`]s.
//!
//! Counters restart at zero on every (re)connect, matching the worker
//! side. Reader tasks from torn-down connections are aborted, and their
//! messages carry a connection generation so a straggler cannot refresh
//! the liveness deadline of a newer connection.

use std::process::Stdio;
use std::time::Instant;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use scribe_core::{Clock, SystemClock};
use scribe_ipc::{
    read_command, write_command, CodeCompletion, Command, CompleteCode, FileContainer,
    ProjectContainer, ProtocolError,
};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::process::{Child, Command as WorkerProcess};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, timeout, Instant as TokioInstant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::error::ClientError;

const OP_QUEUE: usize = 64;
const EVENT_QUEUE: usize = 64;

/// What the worker reported back, surfaced to the embedder.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// Ranked completions for the last `complete_code` request.
    CodeCompleted(Vec<CodeCompletion>),
    /// An unregister named project parts the worker never had.
    ProjectsDoNotExist(Vec<String>),
    /// A request named a translation unit the worker never had.
    TranslationUnitDoesNotExist(FileContainer),
    /// The worker was finished and respawned. Its registry is empty;
    /// the embedder must register projects and files again.
    ProcessRestarted,
}

/// Handle to the supervisor task. Cloneable; every clone talks to the
/// same worker.
#[derive(Clone)]
pub struct WorkerClient {
    op_tx: mpsc::Sender<Op>,
}

impl WorkerClient {
    /// Start supervising: connect to an already-running worker or spawn
    /// one, then hand back the handle and the event stream.
    pub fn start(config: WorkerConfig) -> (Self, mpsc::Receiver<WorkerEvent>) {
        Self::start_with_clock(config, SystemClock)
    }

    /// Same, with the clock injected. Tests pair this with
    /// `FakeClock` to drive liveness deadlines without sleeping.
    pub fn start_with_clock<C: Clock + 'static>(
        config: WorkerConfig,
        clock: C,
    ) -> (Self, mpsc::Receiver<WorkerEvent>) {
        let (op_tx, op_rx) = mpsc::channel(OP_QUEUE);
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE);
        let (supervisor, internal_rx) = Supervisor::new(config, clock, event_tx);
        tokio::spawn(supervisor.run(op_rx, internal_rx));
        (Self { op_tx }, event_rx)
    }

    pub async fn register_projects(
        &self,
        projects: Vec<ProjectContainer>,
    ) -> Result<(), ClientError> {
        self.send(Command::RegisterProjects(projects)).await
    }

    pub async fn unregister_projects(&self, project_paths: Vec<String>) -> Result<(), ClientError> {
        self.send(Command::UnregisterProjects(project_paths)).await
    }

    pub async fn register_files(&self, files: Vec<FileContainer>) -> Result<(), ClientError> {
        self.send(Command::RegisterFiles(files)).await
    }

    pub async fn unregister_files(&self, files: Vec<FileContainer>) -> Result<(), ClientError> {
        self.send(Command::UnregisterFiles(files)).await
    }

    pub async fn complete_code(&self, request: CompleteCode) -> Result<(), ClientError> {
        self.send(Command::CompleteCode(request)).await
    }

    /// Round-trip probe. The echoed reply refreshes the liveness
    /// deadline like any other received command.
    pub async fn echo(&self) -> Result<(), ClientError> {
        self.send(Command::Echo(None)).await
    }

    /// Finish the worker and bring up a fresh one. Emits exactly one
    /// [`WorkerEvent::ProcessRestarted`] on success.
    pub async fn restart(&self) -> Result<(), ClientError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.op_tx
            .send(Op::Restart(ack_tx))
            .await
            .map_err(|_| ClientError::SupervisorGone)?;
        ack_rx.await.map_err(|_| ClientError::SupervisorGone)?
    }

    /// Finish the worker and stop supervising. Emits nothing; safe to
    /// call more than once.
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.op_tx.send(Op::Shutdown(ack_tx)).await.is_err() {
            // Supervisor already gone; nothing left to finish.
            return Ok(());
        }
        let _ = ack_rx.await;
        Ok(())
    }

    async fn send(&self, command: Command) -> Result<(), ClientError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.op_tx
            .send(Op::Send(command, ack_tx))
            .await
            .map_err(|_| ClientError::SupervisorGone)?;
        ack_rx.await.map_err(|_| ClientError::SupervisorGone)?
    }
}

enum Op {
    Send(Command, oneshot::Sender<Result<(), ClientError>>),
    Restart(oneshot::Sender<Result<(), ClientError>>),
    Shutdown(oneshot::Sender<()>),
}

enum Internal {
    Received(u64, Command),
    Closed(u64),
}

struct Connection {
    writer: OwnedWriteHalf,
    send_counter: u64,
    reader_task: JoinHandle<()>,
}

struct Supervisor<C: Clock> {
    config: WorkerConfig,
    clock: C,
    event_tx: mpsc::Sender<WorkerEvent>,
    internal_tx: mpsc::Sender<Internal>,
    connection: Option<Connection>,
    child: Option<Child>,
    /// Bumped on every successful attach; messages from older readers
    /// are dropped.
    generation: u64,
    last_alive: Instant,
}

impl<C: Clock> Supervisor<C> {
    fn new(
        config: WorkerConfig,
        clock: C,
        event_tx: mpsc::Sender<WorkerEvent>,
    ) -> (Self, mpsc::Receiver<Internal>) {
        let (internal_tx, internal_rx) = mpsc::channel(EVENT_QUEUE);
        let last_alive = clock.now();
        let supervisor = Self {
            config,
            clock,
            event_tx,
            internal_tx,
            connection: None,
            child: None,
            generation: 0,
            last_alive,
        };
        (supervisor, internal_rx)
    }

    async fn run(
        mut self,
        mut op_rx: mpsc::Receiver<Op>,
        mut internal_rx: mpsc::Receiver<Internal>,
    ) {
        if let Err(error) = self.connect().await {
            warn!(%error, "initial worker connect failed");
        }
        let mut liveness = interval_at(
            TokioInstant::now() + self.config.liveness_interval,
            self.config.liveness_interval,
        );
        liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                op = op_rx.recv() => match op {
                    Some(Op::Send(command, ack)) => {
                        let _ = ack.send(self.send_command(command).await);
                    }
                    Some(Op::Restart(ack)) => {
                        let _ = ack.send(self.restart_worker().await);
                    }
                    Some(Op::Shutdown(ack)) => {
                        self.finish_worker().await;
                        let _ = ack.send(());
                        return;
                    }
                    // Every handle dropped; take the worker down with us.
                    None => {
                        self.finish_worker().await;
                        return;
                    }
                },
                internal = internal_rx.recv() => {
                    if let Some(internal) = internal {
                        self.handle_internal(internal).await;
                    }
                }
                _ = liveness.tick() => self.check_liveness().await,
            }
        }
    }

    async fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::Received(generation, command) => {
                if generation != self.generation {
                    return;
                }
                self.last_alive = self.clock.now();
                self.forward(command).await;
            }
            Internal::Closed(generation) => {
                if generation != self.generation {
                    return;
                }
                warn!("worker connection lost");
                if let Err(error) = self.restart_worker().await {
                    warn!(%error, "restart after lost connection failed");
                }
            }
        }
    }

    async fn forward(&mut self, command: Command) {
        let event = match command {
            // Echo replies only feed the liveness deadline.
            Command::Echo(_) => return,
            Command::CodeCompleted(completions) => WorkerEvent::CodeCompleted(completions),
            Command::ProjectsDoNotExist(paths) => WorkerEvent::ProjectsDoNotExist(paths),
            Command::TranslationUnitDoesNotExist(file) => {
                WorkerEvent::TranslationUnitDoesNotExist(file)
            }
            other => {
                warn!(command = other.name(), "dropping misdirected command from worker");
                return;
            }
        };
        if self.event_tx.send(event).await.is_err() {
            debug!("event receiver dropped");
        }
    }

    async fn send_command(&mut self, command: Command) -> Result<(), ClientError> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(ClientError::NotConnected);
        };
        match write_command(&mut connection.writer, &mut connection.send_counter, &command).await {
            Ok(()) => Ok(()),
            Err(error) => {
                warn!(%error, "send failed, restarting worker");
                if let Err(restart_error) = self.restart_worker().await {
                    warn!(%restart_error, "restart after failed send failed");
                }
                Err(ClientError::Protocol(error))
            }
        }
    }

    /// Try the socket as-is first; a worker may already be serving it.
    /// Otherwise spawn one and retry until it binds.
    async fn connect(&mut self) -> Result<(), ClientError> {
        if let Ok(stream) = UnixStream::connect(&self.config.socket_path).await {
            return self.attach(stream).await;
        }
        self.spawn_worker()?;
        for _ in 0..self.config.connect_attempts {
            if let Ok(Ok(stream)) = timeout(
                self.config.connect_timeout,
                UnixStream::connect(&self.config.socket_path),
            )
            .await
            {
                return self.attach(stream).await;
            }
            sleep(self.config.connect_retry_delay).await;
        }
        Err(ClientError::ConnectFailed {
            path: self.config.socket_path.clone(),
            attempts: self.config.connect_attempts,
        })
    }

    /// Echo handshake, then split the stream and start the reader.
    /// Counters start over with every connection, on both sides.
    async fn attach(&mut self, mut stream: UnixStream) -> Result<(), ClientError> {
        let mut send_counter = 0u64;
        let mut recv_counter = 0u64;
        write_command(&mut stream, &mut send_counter, &Command::Echo(None)).await?;
        let reply = timeout(
            crate::env::ipc_timeout(),
            read_command(&mut stream, &mut recv_counter),
        )
        .await
        .map_err(|_| ClientError::HandshakeFailed)??;
        if !matches!(reply, Command::Echo(None)) {
            return Err(ClientError::HandshakeFailed);
        }

        self.generation += 1;
        let (read_half, write_half) = stream.into_split();
        let reader_task = tokio::spawn(reader_loop(
            read_half,
            recv_counter,
            self.generation,
            self.internal_tx.clone(),
        ));
        self.connection = Some(Connection {
            writer: write_half,
            send_counter,
            reader_task,
        });
        self.last_alive = self.clock.now();
        info!(socket = %self.config.socket_path.display(), "connected to worker");
        Ok(())
    }

    fn spawn_worker(&mut self) -> Result<(), ClientError> {
        let child = WorkerProcess::new(&self.config.executable)
            .arg(&self.config.socket_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ClientError::WorkerSpawn {
                path: self.config.executable.clone(),
                source,
            })?;
        info!(pid = child.id(), executable = %self.config.executable.display(), "spawned worker");
        self.child = Some(child);
        Ok(())
    }

    /// Finish the worker and bring up a fresh one. The embedder hears
    /// about it exactly once, through `ProcessRestarted`.
    async fn restart_worker(&mut self) -> Result<(), ClientError> {
        info!("restarting worker");
        self.finish_worker().await;
        self.connect().await?;
        if self.event_tx.send(WorkerEvent::ProcessRestarted).await.is_err() {
            debug!("event receiver dropped");
        }
        Ok(())
    }

    async fn finish_worker(&mut self) {
        self.disconnect().await;
        self.finish_child().await;
    }

    /// Best-effort farewell, then tear the connection down.
    async fn disconnect(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };
        let farewell = write_command(
            &mut connection.writer,
            &mut connection.send_counter,
            &Command::End,
        );
        match timeout(self.config.finish_timeout, farewell).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => debug!(%error, "end command not delivered"),
            Err(_) => debug!("end command timed out"),
        }
        connection.reader_task.abort();
    }

    /// SIGTERM, bounded wait, then SIGKILL.
    async fn finish_child(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Some(pid) = child.id() {
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
        match timeout(self.config.finish_timeout, child.wait()).await {
            Ok(Ok(status)) => debug!(%status, "worker exited"),
            Ok(Err(error)) => warn!(%error, "failed to reap worker"),
            Err(_) => {
                warn!("worker ignored SIGTERM, killing");
                if let Err(error) = child.kill().await {
                    warn!(%error, "failed to kill worker");
                }
            }
        }
    }

    /// A connection silent for a full interval is declared dead.
    /// Otherwise a probe goes out; its echo refreshes the deadline.
    async fn check_liveness(&mut self) {
        if self.connection.is_none() {
            return;
        }
        if self.clock.now() > self.last_alive + self.config.liveness_interval {
            warn!("worker stopped answering");
            if let Err(error) = self.restart_worker().await {
                warn!(%error, "restart after liveness expiry failed");
            }
            return;
        }
        let probe = match self.connection.as_mut() {
            Some(connection) => {
                write_command(
                    &mut connection.writer,
                    &mut connection.send_counter,
                    &Command::Echo(None),
                )
                .await
            }
            None => return,
        };
        if let Err(error) = probe {
            debug!(%error, "liveness probe not delivered");
        }
    }
}

async fn reader_loop(
    mut reader: OwnedReadHalf,
    mut recv_counter: u64,
    generation: u64,
    internal_tx: mpsc::Sender<Internal>,
) {
    loop {
        match read_command(&mut reader, &mut recv_counter).await {
            Ok(command) => {
                if internal_tx
                    .send(Internal::Received(generation, command))
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(ProtocolError::ConnectionClosed) => break,
            Err(error) => {
                warn!(%error, "worker connection broke");
                break;
            }
        }
    }
    let _ = internal_tx.send(Internal::Closed(generation)).await;
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
