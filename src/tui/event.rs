//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use tokio::sync::mpsc;

use crate::models::{Interval, SeriesKey};

use super::app::App;

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),
    /// Request to quit the application.
    Quit,
}

/// Actions that require the session manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A selector changed; switch the live session to this key.
    Select(SeriesKey),
    /// Reopen the session for the current key.
    Reconnect,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    // Raw mode swallows SIGINT.
                    let message = if is_ctrl_c(&key) {
                        Message::Quit
                    } else {
                        Message::Input(Event::Key(key))
                    };
                    if tx.send(message).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_errors();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }

        // Symbol selector
        KeyCode::Char('j') | KeyCode::Down => app.selection.next_symbol().map(Action::Select),
        KeyCode::Char('k') | KeyCode::Up => app.selection.previous_symbol().map(Action::Select),

        // Interval selector shortcuts
        KeyCode::Char('1') => select_interval(app, Interval::M1),
        KeyCode::Char('2') => select_interval(app, Interval::M5),
        KeyCode::Char('3') => select_interval(app, Interval::M15),
        KeyCode::Char('4') => select_interval(app, Interval::H1),
        KeyCode::Char('5') => select_interval(app, Interval::H4),
        KeyCode::Char('6') => select_interval(app, Interval::D1),
        KeyCode::Char(']') | KeyCode::Right => {
            let next = app.selection.interval().next();
            select_interval(app, next)
        }
        KeyCode::Char('[') | KeyCode::Left => {
            let previous = app.selection.interval().previous();
            select_interval(app, previous)
        }

        KeyCode::Char('r') => Some(Action::Reconnect),

        _ => None,
    }
}

fn select_interval(app: &mut App, interval: Interval) -> Option<Action> {
    app.selection.set_interval(interval).map(Action::Select)
}
