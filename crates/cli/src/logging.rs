//! Tracing setup for `nsv`.
//!
//! Two layers: human output on stderr at `logging.level`, and an optional
//! append-only file at `logging.file_level`. `RUST_LOG` directives apply to
//! both. File lines are written by a background thread, so the returned
//! [`LogGuard`] has to outlive every event that should reach the file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use notesieve_core::config::types::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Keeps the file writer alive. Dropping it drains pending lines, so drop it
/// before any `process::exit`.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

pub fn init(cfg: &LoggingConfig) -> LogGuard {
    let stderr_level = level_or(&cfg.level, LevelFilter::INFO);
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(filter(stderr_level));

    let mut file_guard = None;
    let file_layer = cfg.file.as_deref().and_then(|path| match open_log_file(path) {
        Ok(file) => {
            let file_level =
                level_or(cfg.file_level.as_deref().unwrap_or(&cfg.level), LevelFilter::DEBUG);
            let (writer, guard) = tracing_appender::non_blocking(file);
            file_guard = Some(guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(filter(file_level)),
            )
        }
        Err(e) => {
            eprintln!("warning: not logging to {}: {e}", path.display());
            None
        }
    });

    // A second init in the same process keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(stderr_layer).with(file_layer).try_init();

    LogGuard { _file: file_guard }
}

/// Open the log file for appending, creating missing parent folders.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

/// Unknown level names fall back instead of failing the command.
fn level_or(name: &str, fallback: LevelFilter) -> LevelFilter {
    name.trim().parse().unwrap_or(fallback)
}
