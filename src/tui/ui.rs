//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

use super::app::App;
use super::components::{chart, status_bar, symbol_bar};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Symbol bar
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Last bar header
            Constraint::Min(6),    // Chart
            Constraint::Length(1), // Interval selector
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    symbol_bar::render(frame, main_layout[0], app);
    status_bar::render(frame, main_layout[1], app);
    chart::render_header(frame, main_layout[2], app);
    chart::render(frame, main_layout[3], app);
    chart::render_intervals(frame, main_layout[4], app);
    render_keybindings(frame, main_layout[5]);
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: Rect) {
    let help = "[j/k]symbol [1-6]1m 5m 15m 1h 4h 1d [ [ ] ]interval [r]econnect [q]quit";

    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
