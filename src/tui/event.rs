use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Submit(String),
}

#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        // Windows reports releases too
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Some(AppEvent::Quit),
                KeyCode::Char('l') => {
                    state.scroll_to_bottom();
                    None
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => {
                state.scroll_to_bottom();
                Some(AppEvent::Submit(state.input.submit()))
            }
            KeyCode::PageUp => {
                state.scroll_up(state.page());
                None
            }
            KeyCode::PageDown => {
                state.scroll_down(state.page());
                None
            }
            _ => {
                state.input.handle_key(key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::ConnectionState;
    use crate::tui::pane::{PaneStyle, TextPane};
    use tokio::sync::watch;

    fn state() -> AppState {
        let style = PaneStyle::default();
        let (_, rx) = watch::channel(ConnectionState::Connected);
        AppState::new(
            TextPane::new(style, 100),
            [TextPane::new(style, 2), TextPane::new(style, 2)],
            rx,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_submits_line() {
        let handler = EventHandler::new();
        let mut state = state();
        for c in "q".chars() {
            handler.handle_key_event(press(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter), &mut state),
            Some(AppEvent::Submit("q".to_string()))
        );
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_empty_line_is_still_submitted() {
        let handler = EventHandler::new();
        let mut state = state();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter), &mut state),
            Some(AppEvent::Submit(String::new()))
        );
    }

    #[test]
    fn test_control_keys_quit() {
        let handler = EventHandler::new();
        let mut state = state();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c, &mut state), Some(AppEvent::Quit));
        assert!(state.input.is_empty());
    }
}
