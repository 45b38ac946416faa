//! Candlestick chart panel.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::models::{Bar, Interval};
use crate::tui::app::App;

/// Width of the price axis, including the separator.
const AXIS_WIDTH: usize = 12;

/// Renders the last-bar header line.
pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let symbol = app.selection.symbol().as_str().to_uppercase();
    let title = Span::styled(
        format!(" {symbol} {} ", app.selection.interval()),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let content = if let Some(bar) = app.chart.last_bar() {
        let color = direction_color(bar);
        let arrow = if bar.is_bullish() { "▲" } else { "▼" };

        Line::from(vec![
            title,
            Span::styled(arrow, Style::default().fg(color)),
            Span::styled(
                format!(" {} ", bar.close),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("O: {} ", bar.open)),
            Span::styled(format!("H: {} ", bar.high), Style::default().fg(Color::Green)),
            Span::styled(format!("L: {} ", bar.low), Style::default().fg(Color::Red)),
            Span::raw(format!("C: {} ", bar.close)),
            Span::styled(
                format!("@ {} UTC", format_open_time(bar.open_time)),
                Style::default().fg(Color::Gray),
            ),
        ])
    } else {
        Line::from(vec![
            title,
            Span::styled(" -- ", Style::default().fg(Color::DarkGray)),
        ])
    };

    let para = Paragraph::new(content).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// Renders the chart of the displayed series.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.chart.key() {
        Some(key) => format!(" Chart {key} "),
        None => " Chart ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bars = app.chart.bars();
    if bars.is_empty() {
        let para = Paragraph::new("No closed bars yet, waiting for the stream")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    }

    let columns = (inner.width as usize).saturating_sub(AXIS_WIDTH);
    let height = inner.height.saturating_sub(1) as usize;
    if columns == 0 || height == 0 {
        return;
    }

    // Newest bar on the right edge.
    let visible = &bars[bars.len().saturating_sub(columns)..];
    let mut lines = candle_rows(visible, height);
    lines.push(time_axis(visible));

    let para = Paragraph::new(lines);
    frame.render_widget(para, inner);
}

/// Renders the interval selector, highlighting the selected interval.
pub fn render_intervals(frame: &mut Frame, area: Rect, app: &App) {
    let selected = app.selection.interval();

    let mut spans = vec![Span::raw(" Interval: ")];
    spans.extend(Interval::ALL.iter().map(|interval| {
        let style = if *interval == selected {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else {
            Style::default()
        };
        Span::styled(format!(" {interval} "), style)
    }));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Builds one line per price level, top to bottom.
fn candle_rows(bars: &[Bar], height: usize) -> Vec<Line<'static>> {
    let (min_price, max_price) = bars
        .iter()
        .fold((Decimal::MAX, Decimal::MIN), |(min, max), b| {
            (min.min(b.low), max.max(b.high))
        });

    if height == 0 {
        return Vec::new();
    }
    let rows = Decimal::from(height);

    // A flat series still gets a one-unit band to draw in. A range too
    // wide for `Decimal` is split per row before subtracting.
    let step = match max_price.checked_sub(min_price) {
        Some(range) if range > Decimal::ZERO => range / rows,
        Some(_) => Decimal::ONE / rows,
        None => (max_price / rows)
            .checked_sub(min_price / rows)
            .unwrap_or(Decimal::MAX),
    };

    (0..height)
        .map(|row| {
            let upper = step
                .checked_mul(Decimal::from(row))
                .and_then(|offset| max_price.checked_sub(offset))
                .unwrap_or(min_price);
            let lower = upper.checked_sub(step).unwrap_or(Decimal::MIN);

            let mut spans = vec![Span::raw(format!(
                "{:>width$.2} │",
                upper,
                width = AXIS_WIDTH - 2
            ))];
            spans.extend(bars.iter().map(|bar| {
                let glyph = candle_glyph(bar, lower, upper);
                Span::styled(glyph, Style::default().fg(direction_color(bar)))
            }));
            Line::from(spans)
        })
        .collect()
}

/// The glyph a bar occupies in the price band `lower..=upper`.
fn candle_glyph(bar: &Bar, lower: Decimal, upper: Decimal) -> &'static str {
    let body_top = bar.open.max(bar.close);
    let body_bottom = bar.open.min(bar.close);

    if bar.high < lower || bar.low > upper {
        " "
    } else if body_top >= lower && body_bottom <= upper {
        "█"
    } else {
        "│"
    }
}

/// Labels the first and last visible bars under the chart.
fn time_axis(bars: &[Bar]) -> Line<'static> {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Line::default();
    };

    let start = format_open_time(first.open_time);
    let end = format_open_time(last.open_time);
    let gap = bars.len().saturating_sub(start.len() + end.len());

    Line::from(vec![
        Span::raw(" ".repeat(AXIS_WIDTH)),
        Span::styled(
            if bars.len() > start.len() + end.len() {
                format!("{start}{}{end}", " ".repeat(gap))
            } else {
                end
            },
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn direction_color(bar: &Bar) -> Color {
    if bar.is_bullish() {
        Color::Green
    } else {
        Color::Red
    }
}

/// Formats an epoch-millisecond open time as `HH:MM` in UTC.
fn format_open_time(open_time: i64) -> String {
    let minutes = open_time.div_euclid(60_000).rem_euclid(24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: i64, high: i64, low: i64, close: i64) -> Bar {
        Bar {
            open_time: 0,
            open: Decimal::from(open),
            high: Decimal::from(high),
            low: Decimal::from(low),
            close: Decimal::from(close),
        }
    }

    #[test]
    fn open_time_formats_as_utc_clock() {
        assert_eq!(format_open_time(0), "00:00");
        // 2024-01-01T13:45:00Z
        assert_eq!(format_open_time(1_704_116_700_000), "13:45");
    }

    #[test]
    fn glyphs_follow_wick_and_body() {
        let candle = bar(10, 14, 6, 12);

        assert_eq!(candle_glyph(&candle, Decimal::from(13), Decimal::from(14)), "│");
        assert_eq!(candle_glyph(&candle, Decimal::from(10), Decimal::from(11)), "█");
        assert_eq!(candle_glyph(&candle, Decimal::from(6), Decimal::from(7)), "│");
        assert_eq!(candle_glyph(&candle, Decimal::from(15), Decimal::from(16)), " ");
    }

    #[test]
    fn flat_series_still_renders_rows() {
        let rows = candle_rows(&[bar(5, 5, 5, 5)], 4);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn extreme_price_range_renders_without_overflow() {
        let extreme = Bar {
            open_time: 0,
            open: Decimal::ZERO,
            high: Decimal::MAX,
            low: Decimal::MIN,
            close: Decimal::ONE,
        };

        assert_eq!(candle_rows(std::slice::from_ref(&extreme), 10).len(), 10);
        assert_eq!(candle_rows(std::slice::from_ref(&extreme), 1).len(), 1);
        assert!(candle_rows(&[extreme], 0).is_empty());
    }
}
