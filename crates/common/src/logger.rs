//! tracing subscriber setup: a compact console stream plus a plain-text file under `LOG_DIR`

use crate::error::StudyHelperError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "studyhelper.log";

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const FALLBACK_LEVEL: &str = "info";

/// Lower-case tracing directive for a configured level name.
/// `None` when the name is not a level we know.
pub fn level_directive(level: &str) -> Option<&'static str> {
    let level = level.trim().to_ascii_lowercase();
    let level = if level == "warning" { "warn" } else { level.as_str() };
    LEVELS.iter().copied().find(|known| *known == level)
}

/// `RUST_LOG` wins; otherwise the configured level, or info if it is unknown
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(level).unwrap_or(FALLBACK_LEVEL)))
}

/// Create the directory if needed and open the log file for appending
pub fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), StudyHelperError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        StudyHelperError::config(format!("Cannot create log directory {}: {}", log_dir.display(), e))
    })?;

    let path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| StudyHelperError::config(format!("Cannot open log file {}: {}", path.display(), e)))?;

    Ok((file, path))
}

fn already_installed(e: impl std::fmt::Display) -> StudyHelperError {
    StudyHelperError::config(format!("Logger already installed: {}", e))
}

fn report_level(level: &str) {
    if level_directive(level).is_none() {
        tracing::warn!("Unknown log level '{}', using {}", level, FALLBACK_LEVEL);
    }
}

/// Install the global subscriber writing to the console and to `log_dir/studyhelper.log`
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), StudyHelperError> {
    let (file, path) = open_log_file(log_dir)?;

    let console = fmt::layer().compact().with_target(true);
    let to_file = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter_for(log_level))
        .with(console)
        .with(to_file)
        .try_init()
        .map_err(already_installed)?;

    report_level(log_level);
    tracing::info!("Logging to {} at level {}", path.display(), log_level);
    Ok(())
}

/// Console-only subscriber, for tools and local runs without a log directory
pub fn setup_console_logging(log_level: &str) -> Result<(), StudyHelperError> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter_for(log_level))
        .try_init()
        .map_err(already_installed)?;

    report_level(log_level);
    Ok(())
}
