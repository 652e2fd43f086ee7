use crate::core::communication::Transport;
use crate::domain::{config::DeviceConfig, error::{CrowComError, CrowComResult}};
use crate::infrastructure::serial::discovery::find_device_port;
use crate::infrastructure::serial::script::{send_script, ScriptMode, ScriptTiming};
use async_trait::async_trait;
use serialport::SerialPort;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

type Port = Box<dyn SerialPort>;

/// Transport over a USB serial port.
///
/// The port is cloned into a read handle and a write handle so the poller
/// and the command lane never wait on each other.
pub struct SerialTransport {
    device: DeviceConfig,
    timing: ScriptTiming,
    reader: Mutex<Option<Port>>,
    writer: Mutex<Option<Port>>,
}

impl SerialTransport {
    pub fn new(device: DeviceConfig) -> Self {
        Self {
            device,
            timing: ScriptTiming::default(),
            reader: Mutex::new(None),
            writer: Mutex::new(None),
        }
    }

    pub fn with_timing(mut self, timing: ScriptTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    fn open_port(device: &DeviceConfig) -> CrowComResult<Port> {
        let path = find_device_port(device)?;
        let port = serialport::new(&path, device.baud_rate)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => CrowComError::DeviceNotFound {
                    criteria: device.criteria(),
                },
                _ => CrowComError::Serial(e),
            })?;
        info!("Serial port {} opened at {} baud", path, device.baud_rate);
        Ok(port)
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&self) -> CrowComResult<()> {
        let device = self.device.clone();
        // Opening can stall on a half-enumerated device; keep it off the runtime.
        let port = tokio::task::spawn_blocking(move || Self::open_port(&device))
            .await
            .map_err(|e| CrowComError::Session {
                message: format!("Port open task failed: {}", e),
            })??;
        let writer = port.try_clone()?;

        *self.reader.lock().await = Some(port);
        *self.writer.lock().await = Some(writer);
        Ok(())
    }

    async fn read(&self, max_bytes: usize) -> CrowComResult<Vec<u8>> {
        let mut guard = self.reader.lock().await;
        let port = guard.as_mut().ok_or(CrowComError::NotConnected)?;

        let result = (|| -> CrowComResult<Vec<u8>> {
            let available = port.bytes_to_read()? as usize;
            if available == 0 {
                return Ok(Vec::new());
            }
            let mut buffer = vec![0u8; available.min(max_bytes)];
            let n = port.read(&mut buffer)?;
            buffer.truncate(n);
            Ok(buffer)
        })();

        match result {
            Ok(data) => {
                if !data.is_empty() {
                    trace!("Received {} bytes: {}", data.len(), hex::encode(&data));
                }
                Ok(data)
            }
            Err(e) => {
                debug!("Read failed, dropping port: {}", e);
                *guard = None;
                Err(e)
            }
        }
    }

    async fn write(&self, text: &str) -> CrowComResult<()> {
        let mut guard = self.writer.lock().await;
        let port = guard.as_mut().ok_or(CrowComError::NotConnected)?;

        let result = port.write_all(text.as_bytes()).and_then(|_| port.flush());
        match result {
            Ok(()) => {
                trace!("Sent {} bytes: {}", text.len(), hex::encode(text.as_bytes()));
                Ok(())
            }
            Err(e) => {
                debug!("Write failed, dropping port: {}", e);
                *guard = None;
                Err(e.into())
            }
        }
    }

    async fn execute(&self, path: &Path) -> CrowComResult<()> {
        send_script(self, path, ScriptMode::Execute, self.timing).await
    }

    async fn upload(&self, path: &Path) -> CrowComResult<()> {
        send_script(self, path, ScriptMode::Upload, self.timing).await
    }

    async fn is_connected(&self) -> bool {
        self.reader.lock().await.is_some()
    }
}
