use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::pane::TextPane;

/// Latest lines of one capture pane, separated from the output by a rule.
pub fn render_capture_pane(f: &mut Frame, area: Rect, pane: &TextPane) {
    let lines: Vec<Line> = pane
        .window(area.height.saturating_sub(1) as usize, 0)
        .into_iter()
        .map(Line::from)
        .collect();

    let widget = Paragraph::new(lines)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(widget, area);
}
