use crate::core::session::ConnectionState;
use tokio::sync::watch;

use super::{input::InputBuffer, pane::TextPane};

/// Number of input channels mirrored in the capture panes.
pub const CAPTURE_PANES: usize = 2;

/// Everything the UI thread renders.
#[derive(Debug)]
pub struct AppState {
    pub output: TextPane,
    pub captures: [TextPane; CAPTURE_PANES],
    pub input: InputBuffer,
    pub connection: watch::Receiver<ConnectionState>,
    /// Lines scrolled up from the bottom of the output pane
    pub scroll_offset: usize,
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(
        output: TextPane,
        captures: [TextPane; CAPTURE_PANES],
        connection: watch::Receiver<ConnectionState>,
    ) -> Self {
        Self {
            output,
            captures,
            input: InputBuffer::new(),
            connection,
            scroll_offset: 0,
            terminal_size: (80, 24),
        }
    }

    /// Bound the prompt's recall history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.input = InputBuffer::with_history_limit(limit);
        self
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max = self.output.line_count().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Page size for PageUp/PageDown, from the last drawn frame.
    pub fn page(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(8)).max(1)
    }
}
