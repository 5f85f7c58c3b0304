//! Tracing setup driven by [`Config`].
//!
//! Log lines go to stdout (compact, with ANSI colors) and are mirrored without colors to
//! `Config::log_file` through a non-blocking appender. The filter comes from
//! `Config::log_filter`, so a `RUST_LOG` placed in `.env` applies as long as configuration is
//! loaded first.
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{Config, DEFAULT_LOG_FILTER};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global tracing subscriber described by `config`.
pub fn init_tracing(config: &Config) {
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = match open_log_file(&config.log_file) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
        }
        Err(err) => {
            eprintln!(
                "Failed to open log file {}: {err}",
                config.log_file.display()
            );
            None
        }
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.log_filter))
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Parse filter directives, falling back to the default filter when they are invalid.
fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("Invalid log filter {directives:?}: {err}; using {DEFAULT_LOG_FILTER:?}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
