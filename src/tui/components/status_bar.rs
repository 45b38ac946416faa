//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::session::SessionState;
use crate::tui::app::App;

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chart = &app.chart;

    let status_color = match chart.connection() {
        SessionState::Open => Color::Green,
        SessionState::Connecting => Color::Yellow,
        SessionState::Closed => Color::Red,
    };

    let key_span = match chart.key() {
        Some(key) => Span::styled(format!(" {key} "), Style::default().fg(Color::Cyan)),
        None => Span::raw(""),
    };

    let error_span = if let Some(ref error) = app.error_message {
        Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::raw("")
    };

    let bar_info = format!(" {} bars ", chart.bars().len());

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", chart.connection().label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        key_span,
        Span::raw("│"),
        error_span,
        Span::raw(format!(
            "{:>width$}",
            bar_info,
            width = area.width.saturating_sub(40) as usize
        )),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
