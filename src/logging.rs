use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::paths::log_file_path;

const LOG_FILTER_ENV: &str = "COVERLET_LOG";

// The terminal belongs to the TUI, so log lines go to a file instead of stderr.
pub fn init_logging() {
    if let Err(err) = try_init_logging() {
        eprintln!("Warning: logging disabled: {err:#}");
    }
}

fn try_init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("failed to install log subscriber")?;
    tracing::debug!(path = %path.display(), "logging initialised");
    Ok(())
}
