use crossterm::event::{KeyCode, KeyEvent};

/// Lines kept for Up/Down recall unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Single-line editor behind the `> ` prompt.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    content: String,
    cursor_position: usize,
    history: Vec<String>,
    history_limit: usize,
    // index into `history` while recalling; None when editing a fresh line
    recall: Option<usize>,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` submitted lines; the oldest go first.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            content: String::new(),
            cursor_position: 0,
            history: Vec::new(),
            history_limit: limit.max(1),
            recall: None,
        }
    }

    /// Apply an editing key. Returns false if the key is not an editing key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.char_len(),
            KeyCode::Up => self.recall_previous(),
            KeyCode::Down => self.recall_next(),
            _ => return false,
        }
        true
    }

    /// Take the current line for submission and remember it.
    pub fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.content);
        self.cursor_position = 0;
        self.recall = None;
        if !line.is_empty() && self.history.last() != Some(&line) {
            self.history.push(line.clone());
            let excess = self.history.len().saturating_sub(self.history_limit);
            self.history.drain(..excess);
        }
        line
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
        self.recall = None;
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, position: usize) -> usize {
        self.content
            .char_indices()
            .nth(position)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.content.insert(at, c);
        self.cursor_position += 1;
    }

    fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.content.remove(at);
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_len() {
            let at = self.byte_index(self.cursor_position);
            self.content.remove(at);
        }
    }

    fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_len() {
            self.cursor_position += 1;
        }
    }

    fn recall_previous(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.recall {
            Some(i) => i.saturating_sub(1),
            None => self.history.len() - 1,
        };
        self.load_recalled(index);
    }

    fn recall_next(&mut self) {
        match self.recall {
            Some(i) if i + 1 < self.history.len() => self.load_recalled(i + 1),
            Some(_) => self.clear(),
            None => {}
        }
    }

    fn load_recalled(&mut self, index: usize) {
        self.recall = Some(index);
        self.content = self.history[index].clone();
        self.cursor_position = self.char_len();
    }
}

impl std::fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
