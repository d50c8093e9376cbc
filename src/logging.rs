//! File-backed logging
//!
//! The terminal belongs to the UI, so records never go to stderr. Logging
//! stays off unless `NTOP_LOG` holds an `env_logger` filter.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;

use crate::constants::{DEFAULT_LOG_FILE, LOG_FILE_ENV, LOG_FILTER_ENV};

/// Where records go: `NTOP_LOG_FILE`, else `ntop.log` in the temp directory.
fn log_path() -> PathBuf {
    env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join(DEFAULT_LOG_FILE))
}

/// Installs the global logger if `NTOP_LOG` is set.
///
/// # Returns
/// The log file path when logging was enabled.
pub fn init() -> Option<PathBuf> {
    let filter = env::var(LOG_FILTER_ENV).ok()?;
    let path = log_path();

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("cannot open log file {}: {}", path.display(), e);
            return None;
        }
    };

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .ok()?;

    Some(path)
}
