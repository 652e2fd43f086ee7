use crate::domain::error::{CrowComError, CrowComResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Script path used by `r` and `u` when no path is given.
pub const DEFAULT_SCRIPT: &str = "./sketch.lua";

/// CrowCom configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrowComConfig {
    /// Script settings
    #[serde(default)]
    pub scripts: ScriptsConfig,
    /// Device discovery and serial settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// Session controller timing
    #[serde(default)]
    pub session: SessionSettings,
    /// Terminal UI settings
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Script settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Script run or uploaded by a bare `r` / `u`
    #[serde(default = "default_script")]
    pub default: String,
}

/// Device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Explicit port path; skips USB discovery when set
    #[serde(default)]
    pub port: Option<String>,
    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// USB vendor id used for discovery
    #[serde(default = "default_vid")]
    pub vid: u16,
    /// USB product id used for discovery
    #[serde(default = "default_pid")]
    pub pid: u16,
}

/// Session controller timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Delay between polls while connected, in microseconds
    #[serde(default = "default_poll_interval_us")]
    pub poll_interval_us: u64,
    /// Delay between polls while reconnecting, in milliseconds
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
    /// Upper bound on a single reconnect attempt, in milliseconds
    #[serde(default = "default_reconnect_timeout_ms")]
    pub reconnect_timeout_ms: u64,
    /// Maximum bytes taken from the transport per poll
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Columns a tab character expands to
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    /// Lines kept in the output pane
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file; the terminal belongs to the UI so logs never go to stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_script() -> String {
    DEFAULT_SCRIPT.to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_vid() -> u16 {
    0x0483
}

fn default_pid() -> u16 {
    0x5740
}

fn default_poll_interval_us() -> u64 {
    1_000
}

fn default_reconnect_interval_ms() -> u64 {
    1_000
}

fn default_reconnect_timeout_ms() -> u64 {
    2_000
}

fn default_read_chunk_size() -> usize {
    10_000
}

fn default_tab_width() -> usize {
    2
}

fn default_history_limit() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            default: default_script(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            vid: default_vid(),
            pid: default_pid(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            poll_interval_us: default_poll_interval_us(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            reconnect_timeout_ms: default_reconnect_timeout_ms(),
            read_chunk_size: default_read_chunk_size(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl CrowComConfig {
    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> CrowComResult<()> {
        self.session.validate()
    }
}

impl ScriptsConfig {
    pub fn default_path(&self) -> PathBuf {
        PathBuf::from(&self.default)
    }
}

impl SessionSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.poll_interval_us)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn reconnect_timeout(&self) -> Duration {
        Duration::from_millis(self.reconnect_timeout_ms)
    }

    /// The reconnect interval must be strictly longer than the poll interval,
    /// and reads and reconnect attempts must be allowed to make progress.
    pub fn validate(&self) -> CrowComResult<()> {
        let invalid = |message: String| Err(CrowComError::Config { message });

        if self.reconnect_interval() <= self.poll_interval() {
            return invalid(format!(
                "session.reconnect_interval_ms ({:?}) must be longer than session.poll_interval_us ({:?})",
                self.reconnect_interval(),
                self.poll_interval()
            ));
        }
        if self.read_chunk_size == 0 {
            return invalid("session.read_chunk_size must be at least 1".to_string());
        }
        if self.reconnect_timeout_ms == 0 {
            return invalid("session.reconnect_timeout_ms must be at least 1".to_string());
        }
        Ok(())
    }
}

impl DeviceConfig {
    /// Human-readable description of what discovery looks for.
    pub fn criteria(&self) -> String {
        match &self.port {
            Some(port) => format!("port {}", port),
            None => format!("usb {:04x}:{:04x}", self.vid, self.pid),
        }
    }
}
