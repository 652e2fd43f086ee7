use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::state::AppState;

pub const PROMPT: &str = "> ";

pub fn render_prompt(f: &mut Frame, area: Rect, state: &AppState) {
    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Yellow)),
        Span::raw(state.input.content()),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let column = (PROMPT.len() + state.input.cursor_position()) as u16;
    f.set_cursor(area.x + column.min(area.width.saturating_sub(1)), area.y);
}
