// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the worker process.

use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber, writing to the worker log file.
/// Returns a `WorkerGuard` that must stay alive for the process
/// lifetime so buffered lines reach disk on exit.
///
/// The filter comes from `SCRIBE_LOG`. If the log directory cannot be
/// created, falls back to stderr-only logging with a warning - never
/// panics.
pub fn init(log_path: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::new(crate::env::log_filter());

    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let filename = log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("scribed.log"));

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e}, falling back to stderr",
            dir.display()
        );
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();
    Some(guard)
}
