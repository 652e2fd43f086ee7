use crate::core::communication::Sink;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Rendering options applied to everything written into a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneStyle {
    /// Columns a `\t` expands to
    pub tab_width: usize,
}

impl PaneStyle {
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }

    fn expand(&self, text: &str) -> String {
        text.replace('\t', &" ".repeat(self.tab_width))
    }
}

impl Default for PaneStyle {
    fn default() -> Self {
        Self::new(2)
    }
}

#[derive(Debug)]
struct PaneBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl PaneBuffer {
    fn append(&mut self, text: &str) {
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            match self.lines.back_mut() {
                Some(last) => last.push_str(first),
                None => self.lines.push_back(first.to_string()),
            }
        }
        for piece in pieces {
            self.lines.push_back(piece.to_string());
        }

        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Scrollback text area shared between the UI thread and session tasks.
///
/// Text is appended as-is; a `\n` starts a new line. Only the newest
/// `max_lines` lines are kept.
#[derive(Debug, Clone)]
pub struct TextPane {
    style: PaneStyle,
    buffer: Arc<Mutex<PaneBuffer>>,
}

impl TextPane {
    pub fn new(style: PaneStyle, max_lines: usize) -> Self {
        Self {
            style,
            buffer: Arc::new(Mutex::new(PaneBuffer {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn with_text(self, text: &str) -> Self {
        self.show(text);
        self
    }

    pub fn style(&self) -> PaneStyle {
        self.style
    }

    /// Snapshot of the current lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The last `count` lines, skipping `offset` lines from the bottom.
    pub fn window(&self, count: usize, offset: usize) -> Vec<String> {
        let lines = self.lines();
        let end = lines.len().saturating_sub(offset);
        let start = end.saturating_sub(count);
        lines[start..end].to_vec()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.lock().map(|b| b.lines.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.lines.clear();
        }
    }
}

impl Sink for TextPane {
    fn show(&self, text: &str) {
        let text = self.style.expand(text);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.append(&text);
        }
    }
}
