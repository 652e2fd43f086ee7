use crate::core::communication::Sink;
use crate::core::events::{event::DeviceEvent, handlers::HandlerRegistry};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Longest unterminated line kept before it is passed on as is.
pub const MAX_PENDING_LINE: usize = 16 * 1024;

/// Turns raw transport bytes into line events and fans them out.
///
/// Reads arrive in arbitrary chunks, so an unterminated tail is kept until the
/// next [`feed`](Self::feed) completes it.
pub struct DeviceEventParser {
    sink: Arc<dyn Sink>,
    handlers: HandlerRegistry,
    pending: Vec<u8>,
}

impl DeviceEventParser {
    pub fn new(sink: Arc<dyn Sink>, handlers: HandlerRegistry) -> Self {
        Self {
            sink,
            handlers,
            pending: Vec::new(),
        }
    }

    /// Bytes of an incomplete line waiting for their terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Consume a chunk and dispatch every line it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<DeviceEvent> {
        trace!("Parser fed {} bytes: {}", bytes.len(), hex::encode(bytes));
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            if let Some(event) = self.complete_line(start, end) {
                events.push(event);
            }
            start = end + 1;
        }
        self.pending.drain(..start);

        if self.pending.len() > MAX_PENDING_LINE {
            warn!("No line terminator in {} bytes, passing them on", self.pending.len());
            events.extend(self.flush());
        }

        events
    }

    /// Dispatch whatever partial line is left, as if it had been terminated.
    pub fn flush(&mut self) -> Option<DeviceEvent> {
        if self.pending.is_empty() {
            return None;
        }
        let end = self.pending.len();
        let event = self.complete_line(0, end);
        self.pending.clear();
        event
    }

    fn complete_line(&self, start: usize, end: usize) -> Option<DeviceEvent> {
        let text = String::from_utf8_lossy(&self.pending[start..end]);
        // a lone CR is what `\n\r` terminators leave between lines
        if !text.is_empty() && text.bytes().all(|b| b == b'\r') {
            return None;
        }
        let line = text.trim_matches('\r');

        let event = DeviceEvent::classify(line);
        self.dispatch(line, &event);
        Some(event)
    }

    fn dispatch(&self, line: &str, event: &DeviceEvent) {
        self.sink.show(&format!("{}\n", line));

        if let (Some(kind), Some(args)) = (event.kind(), event.args()) {
            let failures = self.handlers.dispatch(line, kind, &args);
            if failures > 0 {
                debug!("{} of {} {} handlers failed", failures, self.handlers.len(kind), kind);
            }
        }
    }
}
