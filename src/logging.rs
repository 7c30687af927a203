//! Logging setup
//!
//! Every run writes its own log file (`coverfetch_<timestamp>.log`) in the
//! configured directory; the console gets the same events filtered by the
//! verbosity flags. `RUST_LOG` overrides both filters.

use crate::error::{CoverError, Result};
use chrono::Local;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Name of the log file for a run started now
pub fn log_file_name() -> String {
    format!("coverfetch_{}.log", Local::now().format("%d-%m-%Y_%H-%M-%S"))
}

/// Create the run log file and install the global subscriber
///
/// Returns the log file path. Fails if the directory or file cannot be
/// created, which aborts the run before any file is processed.
pub fn init(logs_dir: &Path, console_level: tracing::Level) -> Result<PathBuf> {
    std::fs::create_dir_all(logs_dir).map_err(|e| CoverError::Output {
        path: logs_dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let log_path = logs_dir.join(log_file_name());
    let file = File::create(&log_path).map_err(|e| CoverError::Output {
        path: log_path.clone(),
        reason: e.to_string(),
    })?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(console_level.to_string().to_lowercase())),
        );

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CoverError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(log_path)
}
