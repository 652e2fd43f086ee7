use crate::core::communication::{Sink, Transport};
use crate::core::events::DeviceEventParser;
use crate::core::session::state::ConnectionState;
use crate::domain::config::SessionSettings;
use crate::domain::error::CrowComError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

pub const LOST_CONNECTION_NOTICE: &str = " <lost connection>";
pub const CONNECTED_NOTICE: &str = " <connected!>";

/// Background half of a session: the only reader of the transport and the
/// only writer of the connection state once the session is running.
pub struct Poller {
    transport: Arc<dyn Transport>,
    sink: Arc<dyn Sink>,
    parser: DeviceEventParser,
    settings: SessionSettings,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl Poller {
    pub fn new(
        transport: Arc<dyn Transport>,
        sink: Arc<dyn Sink>,
        parser: DeviceEventParser,
        settings: SessionSettings,
        state: Arc<watch::Sender<ConnectionState>>,
    ) -> Self {
        Self {
            transport,
            sink,
            parser,
            settings,
            state,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn set_state(&self, next: ConnectionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!("Connection state {} -> {}", previous, next);
        }
    }

    /// Delay before the next step for the current state.
    pub fn interval(&self) -> Duration {
        match self.state() {
            ConnectionState::Connected => self.settings.poll_interval(),
            ConnectionState::Disconnected | ConnectionState::Reconnecting => {
                self.settings.reconnect_interval()
            }
        }
    }

    /// Run one poll iteration and return how long to sleep afterwards.
    pub async fn step(&mut self) -> Duration {
        match self.state() {
            ConnectionState::Connected => self.poll().await,
            ConnectionState::Disconnected | ConnectionState::Reconnecting => {
                self.reconnect().await
            }
        }
        self.interval()
    }

    /// Poll until `shutdown` fires or its sender is dropped, then flush the
    /// partial line still held by the parser.
    ///
    /// Every await point (read, reconnect, sleep) is a safe place to cancel.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        info!("Poller started");
        loop {
            let delay = tokio::select! {
                delay = self.step() => delay,
                _ = &mut shutdown => break,
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => break,
            }
        }
        self.parser.flush();
        info!("Poller stopped");
    }

    async fn poll(&mut self) {
        match self.transport.read(self.settings.read_chunk_size).await {
            Ok(data) if data.is_empty() => {}
            Ok(data) => {
                self.parser.feed(&data);
            }
            Err(e) if e.is_link_failure() => {
                self.parser.flush();
                self.sink.show(LOST_CONNECTION_NOTICE);
                info!("Lost connection: {}", e);
                self.set_state(ConnectionState::Reconnecting);
                self.reconnect().await;
            }
            Err(e) => warn!("Read failed, keeping the link: {}", e),
        }
    }

    async fn reconnect(&mut self) {
        let limit = self.settings.reconnect_timeout();
        let attempt = tokio::time::timeout(limit, self.transport.connect())
            .await
            .unwrap_or(Err(CrowComError::Timeout(limit)));

        match attempt {
            Ok(()) => {
                self.sink.show(CONNECTED_NOTICE);
                info!("Reconnected");
                self.set_state(ConnectionState::Connected);
            }
            Err(e @ CrowComError::Timeout(_)) => warn!("Reconnect abandoned: {}", e),
            Err(e) => debug!("Reconnect failed: {}", e),
        }
    }
}
