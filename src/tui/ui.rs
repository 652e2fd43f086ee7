use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::{
    state::AppState,
    widgets::{
        capture::render_capture_pane, output::render_output_pane, prompt::render_prompt,
        status::render_status_bar,
    },
};

/// Rows of text shown in each capture pane.
pub const CAPTURE_ROWS: u16 = 2;

pub fn draw_ui(f: &mut Frame, state: &mut AppState) {
    let size = f.size();
    state.terminal_size = (size.width, size.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CAPTURE_ROWS + 1), // captures + rule
            Constraint::Min(0),                   // output
            Constraint::Length(1),                // status
            Constraint::Length(1),                // prompt
        ])
        .split(size);

    let captures = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    for (area, pane) in captures.iter().zip(state.captures.iter()) {
        render_capture_pane(f, *area, pane);
    }
    render_output_pane(f, chunks[1], state);
    render_status_bar(f, chunks[2], state);
    render_prompt(f, chunks[3], state);
}
