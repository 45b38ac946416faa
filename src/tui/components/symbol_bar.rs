//! Symbol selector bar.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::App;

/// Renders the symbol selector, highlighting the selected symbol.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let selection = &app.selection;
    let mut spans: Vec<Span> = Vec::new();

    for (i, symbol) in selection.symbols().iter().enumerate() {
        let is_active = i == selection.symbol_index();

        let style = if is_active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(
            format!(" {} ", symbol.as_str().to_uppercase()),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    let line = Line::from(spans);
    let para = Paragraph::new(line);
    frame.render_widget(para, area);
}
