use crate::domain::error::CrowComResult;
use async_trait::async_trait;
use std::path::Path;

/// Line terminator the device expects after every command line.
pub const LINE_ENDING: &str = "\r\n";

/// Byte-stream endpoint connecting the console to the device.
///
/// Reads and writes form two independent lanes: the session poller is the only
/// reader, the command interpreter the only writer. Implementations may rely
/// on that and never see both lanes used from the same task.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish (or re-establish) the link.
    async fn connect(&self) -> CrowComResult<()>;

    /// Return whatever is available right now, at most `max_bytes`.
    ///
    /// An empty vector means nothing is pending; an error means the link is gone.
    async fn read(&self, max_bytes: usize) -> CrowComResult<Vec<u8>>;

    /// Send raw text without a terminator.
    async fn write(&self, text: &str) -> CrowComResult<()>;

    /// Send text followed by [`LINE_ENDING`].
    async fn writeline(&self, text: &str) -> CrowComResult<()> {
        self.write(&format!("{}{}", text, LINE_ENDING)).await
    }

    /// Send a script and run it immediately.
    async fn execute(&self, path: &Path) -> CrowComResult<()>;

    /// Send a script and store it on the device.
    async fn upload(&self, path: &Path) -> CrowComResult<()>;

    /// Whether a port is currently open.
    async fn is_connected(&self) -> bool;
}
