//! File logging
//!
//! The TUI owns the terminal, so log output goes to a daily-rolling file.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingConfig};

pub const DEFAULT_FILTER: &str = "qmonitor=info";

/// Install the global subscriber
///
/// Returns `None` when no log directory can be determined. The guard must be
/// held until exit or buffered lines are lost.
pub fn init(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let Some(dir) = config::log_dir(logging) else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).with_context(|| format!("create log dir {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, "qmonitor.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter(logging))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install subscriber: {err}"))?;

    Ok(Some(guard))
}

fn filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = logging.filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}
