use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::session::ConnectionState;
use crate::tui::state::AppState;

pub const STATUS_TITLE: &str = "crowcom////";

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let connection = state.connection_state();
    let connection_style = match connection {
        ConnectionState::Connected => Style::default().fg(Color::Green),
        ConnectionState::Reconnecting => Style::default().fg(Color::Yellow),
        ConnectionState::Disconnected => Style::default().fg(Color::Red),
    };

    let mut spans = vec![
        Span::styled(STATUS_TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(connection.to_string(), connection_style),
    ];
    if state.scroll_offset > 0 {
        spans.push(Span::styled(
            format!(" | scrolled {} lines", state.scroll_offset),
            Style::default().fg(Color::Gray),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(status, area);
}
