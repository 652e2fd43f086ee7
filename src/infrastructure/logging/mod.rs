// Logging module - Logging infrastructure
use crate::domain::{config::LoggingConfig, error::{CrowComError, CrowComResult}};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resolve where log output goes when the config does not name a file.
pub fn log_file_path(config: &LoggingConfig) -> PathBuf {
    config.file.clone().unwrap_or_else(|| {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("crowcom")
            .join("crowcom.log")
    })
}

fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config.level.as_str() };
    format!("crowcom={},warn", level)
}

/// Initialize logging system
///
/// The terminal is owned by the UI while a session runs, so records are
/// appended to a file instead of stderr.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> CrowComResult<PathBuf> {
    let path = log_file_path(config);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| CrowComError::Config {
            message: format!("Failed to install log subscriber: {}", e),
        })?;

    tracing::info!("CrowCom logging system initialized");
    Ok(path)
}
