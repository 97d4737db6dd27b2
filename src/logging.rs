use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Parses a filter directive, falling back to `info` when it is malformed.
pub fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs a global subscriber writing to `path`. Without a path no
/// subscriber is installed and events are discarded. Output never goes to the
/// terminal, which belongs to the maze.
pub fn init(path: Option<&Path>, filter: &str) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;
    Ok(true)
}
