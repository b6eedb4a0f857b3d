use crate::Result;
use anyhow::{anyhow, Context};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

const DEFAULT_LEVEL: &str = "info";

/// Guard that keeps the non-blocking file sink alive for the duration of the
/// command.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_file_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// Log file backing the file sink, if one was configured.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }
}

/// Initialize tracing for the process: console sink on stderr filtered by
/// `RUST_LOG` (default `info`), plus an optional file sink when
/// `ESTEIRA_LOG_FILE` points at a path. Errors when invoked more than once
/// per process unless tests explicitly reset the guard.
pub fn init(verbose: bool) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let default_level = if verbose { "debug" } else { DEFAULT_LEVEL };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("failed to configure tracing level")?;

    let log_file_path = env::var("ESTEIRA_LOG_FILE").ok().map(PathBuf::from);
    let (file_layer, file_guard) = match &log_file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(env_filter)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_file_path,
    })
}

#[cfg(test)]
/// Reset the initialization guard so tests can reconfigure logging.
pub fn reset_for_tests() {
    LOGGER_INITIALIZED.store(false, Ordering::SeqCst);
}
