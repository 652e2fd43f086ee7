// TUI module - Terminal User Interface

pub mod app;
pub mod capture;
pub mod event;
pub mod input;
pub mod pane;
pub mod state;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use capture::capture_handlers;
pub use pane::{PaneStyle, TextPane};
pub use state::AppState;

/// First text in the output pane.
pub const INTRO_TEXT: &str = "//// crowcom. q to quit. h for help\n\n";
