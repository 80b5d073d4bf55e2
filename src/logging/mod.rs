pub mod sink;

pub use sink::BuildLog;

use crate::Result;
use anyhow::{anyhow, Context};
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Guard that keeps the file sink flushing for the duration of the command.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_file_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// Returns the log file path backed by the file sink, when enabled.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }
}

/// Resolve where the file sink writes. A working directory keeps the log
/// next to the build; otherwise it lands under the user's home directory.
pub fn log_file_path(workdir: Option<&Path>) -> PathBuf {
    match workdir {
        Some(dir) => dir.join("wixforge.log"),
        None => dirs_next::home_dir()
            .map(|home| home.join(".wixforge").join("wixforge.log"))
            .unwrap_or_else(|| PathBuf::from("wixforge.log")),
    }
}

/// Initialize the tracing stack: env-filter (RUST_LOG override), a plain
/// console layer on stderr, and an optional non-blocking file layer.
/// Errors when invoked more than once per process invocation unless tests
/// explicitly reset the guard.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let default_level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("failed to configure tracing level")?;

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_level(true);

    match log_file {
        Some(path) => {
            let directory = path.parent().ok_or_else(|| {
                anyhow!("log file path {} has no parent directory", path.display())
            })?;
            create_dir_all(directory)
                .with_context(|| format!("failed to create log directory {}", directory.display()))?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
            Ok(LoggingGuard {
                _file_guard: Some(guard),
                log_file_path: Some(path.to_path_buf()),
            })
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            Ok(LoggingGuard {
                _file_guard: None,
                log_file_path: None,
            })
        }
    }
}

#[cfg(test)]
/// Reset the initialization guard so tests can reconfigure logging.
pub fn reset_for_tests() {
    LOGGER_INITIALIZED.store(false, Ordering::SeqCst);
}
