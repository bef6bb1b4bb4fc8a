// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Each accepted connection gets a reader loop and a writer task. The
//! reader decodes commands and forwards them to the dispatcher with a
//! per-connection reply sender; the writer drains that channel so a
//! slow client never stalls dispatch. Message counters start over for
//! every connection, in both directions.

use std::sync::Arc;

use scribe_ipc::{read_command, write_command, Command, ProtocolError};
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::dispatcher::Incoming;

/// Capacity of one connection's reply queue.
const REPLY_QUEUE: usize = 64;

/// Shared context for all connections.
pub struct ListenCtx {
    pub dispatch_tx: mpsc::Sender<Incoming>,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Received {0}, which only the worker may send")]
    WrongDirection(&'static str),

    #[error("Worker is shutting down")]
    Draining,
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Run the accept loop, spawning a task per connection. The loop
    /// ends when the worker shuts down and this task is dropped.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("Unix accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        _ => warn!("Connection error: {}", e),
    }
}

/// Handle a single client connection until it closes or misbehaves.
async fn handle_connection(stream: UnixStream, ctx: &ListenCtx) -> Result<(), ConnectionError> {
    info!("client connected");
    let (mut reader, mut writer) = stream.into_split();

    let (reply_tx, mut reply_rx) = mpsc::channel::<Command>(REPLY_QUEUE);
    tokio::spawn(async move {
        let mut send_counter = 0u64;
        while let Some(reply) = reply_rx.recv().await {
            if let Err(error) = write_command(&mut writer, &mut send_counter, &reply).await {
                debug!(%error, "failed to write reply");
                break;
            }
        }
    });

    let mut recv_counter = 0u64;
    read_loop(&mut reader, reply_tx, &mut recv_counter, ctx).await
}

async fn read_loop<R>(
    reader: &mut R,
    reply_tx: mpsc::Sender<Command>,
    recv_counter: &mut u64,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
{
    loop {
        let command = match read_command(reader, recv_counter).await {
            Ok(command) => command,
            Err(ProtocolError::ConnectionClosed) => {
                debug!("Client disconnected");
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };
        // Reply-direction traffic from a client is a protocol breach;
        // the connection is dropped rather than guessed at.
        if !command.is_worker_bound() {
            return Err(ConnectionError::WrongDirection(command.name()));
        }
        debug!(command = command.name(), "received command");
        let incoming = Incoming { command, reply_tx: reply_tx.clone() };
        if ctx.dispatch_tx.send(incoming).await.is_err() {
            return Err(ConnectionError::Draining);
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
