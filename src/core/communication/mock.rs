// In-memory transport used by the unit and integration tests
use crate::core::communication::transport::Transport;
use crate::domain::error::{CrowComError, CrowComResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One recorded call against a [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Connect,
    Read(usize),
    Write(String),
    WriteLine(String),
    Execute(PathBuf),
    Upload(PathBuf),
}

impl TransportCall {
    pub fn is_read(&self) -> bool {
        matches!(self, TransportCall::Read(_))
    }
}

/// Scripted outcome of one `read` call.
#[derive(Debug, Clone)]
pub enum ReadStep {
    Data(Vec<u8>),
    /// The link dropped.
    Fail,
    /// A read error that leaves the link up.
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<TransportCall>,
    reads: VecDeque<ReadStep>,
    connects: VecDeque<bool>,
    connected: bool,
    fail_writes: bool,
}

/// Transport that records calls and replays scripted reads.
///
/// Reads with nothing scripted return an empty chunk; connects with nothing
/// scripted succeed.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected() -> Self {
        let transport = Self::new();
        transport.with_state(|s| s.connected = true);
        transport
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    pub fn push_read(&self, data: impl Into<Vec<u8>>) {
        let data = data.into();
        self.with_state(|s| s.reads.push_back(ReadStep::Data(data)));
    }

    pub fn push_read_failure(&self) {
        self.with_state(|s| s.reads.push_back(ReadStep::Fail));
    }

    pub fn push_read_error(&self, message: &str) {
        let message = message.to_string();
        self.with_state(|s| s.reads.push_back(ReadStep::Error(message)));
    }

    pub fn push_connect(&self, succeeds: bool) {
        self.with_state(|s| s.connects.push_back(succeeds));
    }

    pub fn fail_writes(&self, fail: bool) {
        self.with_state(|s| s.fail_writes = fail);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// Calls other than reads, i.e. everything the write lane did.
    pub fn write_calls(&self) -> Vec<TransportCall> {
        self.calls().into_iter().filter(|c| !c.is_read()).collect()
    }

    fn record_write(&self, call: TransportCall) -> CrowComResult<()> {
        self.with_state(|s| {
            s.calls.push(call);
            if s.fail_writes || !s.connected {
                Err(CrowComError::NotConnected)
            } else {
                Ok(())
            }
        })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self) -> CrowComResult<()> {
        self.with_state(|s| {
            s.calls.push(TransportCall::Connect);
            if s.connects.pop_front().unwrap_or(true) {
                s.connected = true;
                Ok(())
            } else {
                s.connected = false;
                Err(CrowComError::DeviceNotFound {
                    criteria: "mock".to_string(),
                })
            }
        })
    }

    async fn read(&self, max_bytes: usize) -> CrowComResult<Vec<u8>> {
        self.with_state(|s| {
            s.calls.push(TransportCall::Read(max_bytes));
            match s.reads.pop_front() {
                Some(ReadStep::Data(mut data)) => {
                    data.truncate(max_bytes);
                    Ok(data)
                }
                Some(ReadStep::Fail) => {
                    s.connected = false;
                    Err(CrowComError::Io(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "device unplugged",
                    )))
                }
                Some(ReadStep::Error(message)) => Err(CrowComError::Session { message }),
                None => Ok(Vec::new()),
            }
        })
    }

    async fn write(&self, text: &str) -> CrowComResult<()> {
        self.record_write(TransportCall::Write(text.to_string()))
    }

    async fn writeline(&self, text: &str) -> CrowComResult<()> {
        self.record_write(TransportCall::WriteLine(text.to_string()))
    }

    async fn execute(&self, path: &Path) -> CrowComResult<()> {
        self.record_write(TransportCall::Execute(path.to_path_buf()))
    }

    async fn upload(&self, path: &Path) -> CrowComResult<()> {
        self.record_write(TransportCall::Upload(path.to_path_buf()))
    }

    async fn is_connected(&self) -> bool {
        self.with_state(|s| s.connected)
    }
}
