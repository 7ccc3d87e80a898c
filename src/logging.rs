//! Log file setup for the CLI.
//!
//! Records go to `<data_dir>/logs/folio.log`. The level comes from the
//! `FOLIO_LOG` environment variable (an `EnvFilter` directive) and defaults
//! to `warn`.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "FOLIO_LOG";
/// Log file name inside the log directory.
pub const LOG_FILE: &str = "folio.log";

/// Directory that receives the log file.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Install the global subscriber writing to the log file.
///
/// Returns the guard that flushes the writer on drop, or `None` if the log
/// file could not be opened or a subscriber is already installed.
/// Logging problems never stop a command from running.
pub fn init(data_dir: &Path) -> Option<WorkerGuard> {
    let dir = log_dir(data_dir);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: Failed to create log directory {}: {}", dir.display(), e);
        return None;
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Failed to open log file in {}: {}", dir.display(), e);
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
