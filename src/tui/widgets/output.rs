use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

use crate::tui::state::AppState;

pub fn render_output_pane(f: &mut Frame, area: Rect, state: &AppState) {
    let lines: Vec<Line> = state
        .output
        .window(area.height as usize, state.scroll_offset)
        .into_iter()
        .map(Line::from)
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}
