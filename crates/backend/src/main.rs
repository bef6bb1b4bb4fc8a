// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! scribed: the out-of-process completion worker.
//!
//! Takes the socket path as its only optional argument; everything
//! else comes from the environment. A second instance against the same
//! socket refuses to start and reports who holds it on stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use scribe_backend::completion::ScanFrontend;
use scribe_backend::dispatcher::{self, Dispatcher};
use scribe_backend::lifecycle::{startup, Config, LifecycleError, StartupResult};
use scribe_backend::listener::{ListenCtx, Listener};
use scribe_backend::logging;
use scribe_core::SystemClock;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, Notify};
use tracing::{error, info, warn};

/// Commands in flight across all connections.
const DISPATCH_QUEUE: usize = 256;

#[tokio::main]
async fn main() -> ExitCode {
    let socket_override = std::env::args().nth(1).map(PathBuf::from);
    let config = match Config::load(socket_override) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("scribed: {error}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init(&config.log_path);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(LifecycleError::LockFailed(_)) => {
            report_already_running(&config);
            ExitCode::FAILURE
        }
        Err(error) => {
            error!("worker failed: {error}");
            eprintln!("scribed: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), LifecycleError> {
    let StartupResult { mut worker, listener } = startup(config)?;

    let shutdown = Arc::new(Notify::new());
    let (dispatch_tx, dispatch_rx) = mpsc::channel(DISPATCH_QUEUE);
    let dispatcher = Dispatcher::new(Box::new(ScanFrontend::new()), SystemClock);
    tokio::spawn(dispatcher::run(dispatcher, dispatch_rx, Arc::clone(&shutdown)));
    tokio::spawn(Listener::new(listener, Arc::new(ListenCtx { dispatch_tx })).run());

    wait_for_shutdown(&shutdown).await;
    worker.shutdown();
    Ok(())
}

/// Block until a client asked for shutdown or the process was signaled.
async fn wait_for_shutdown(shutdown: &Notify) {
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut term), Ok(mut int)) => {
            tokio::select! {
                _ = shutdown.notified() => info!("shutdown requested by client"),
                _ = term.recv() => info!("received SIGTERM"),
                _ = int.recv() => info!("received SIGINT"),
            }
        }
        _ => {
            warn!("failed to install signal handlers");
            shutdown.notified().await;
        }
    }
}

/// The stderr block the supervising client parses when it loses the
/// startup race.
fn report_already_running(config: &Config) {
    eprintln!("scribed is already running");
    if let Ok(pid) = std::fs::read_to_string(&config.lock_path) {
        eprintln!("pid: {}", pid.trim());
    }
    if let Ok(version) = std::fs::read_to_string(&config.version_path) {
        eprintln!("version: {}", version.trim());
    }
}
