use std::path::PathBuf;
use thiserror::Error;

/// CrowCom unified error type
#[derive(Error, Debug)]
pub enum CrowComError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Device not found: no serial port matches {criteria}")]
    DeviceNotFound { criteria: String },

    #[error("Device not connected")]
    NotConnected,

    #[error("Connection attempt timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Script error ({}): {message}", path.display())]
    Script { path: PathBuf, message: String },

    #[error("Terminal UI error: {0}")]
    Tui(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl CrowComError {
    /// Whether a failed read means the link is gone.
    ///
    /// The poller reconnects only for these; anything else is logged and the
    /// link is kept.
    pub fn is_link_failure(&self) -> bool {
        matches!(
            self,
            CrowComError::Serial(_)
                | CrowComError::Io(_)
                | CrowComError::NotConnected
                | CrowComError::DeviceNotFound { .. }
                | CrowComError::Timeout(_)
        )
    }
}

pub type CrowComResult<T> = Result<T, CrowComError>;
