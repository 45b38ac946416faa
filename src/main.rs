use std::fs::OpenOptions;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wickline::WicklineError;
use wickline::config::{AppConfig, fetch_config};
use wickline::persistence::JsonFileStorage;
use wickline::session::SessionManager;
use wickline::tls::install_crypto_provider;
use wickline::tui::event::{spawn_event_reader, spawn_tick_timer, update};
use wickline::tui::{Action, App, Selection, Tui, render, restore_terminal, setup_terminal};
use wickline::websocket::{CloseReason, FeedEvent, WsTransport};

/// Milliseconds between ticks that expire stale errors.
const TICK_INTERVAL_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<(), WicklineError> {
    let app_config = fetch_config()?;
    init_logging(&app_config)?;
    install_crypto_provider();

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, app_config).await;
    restore_terminal(&mut terminal)?;

    if let Err(ref e) = result {
        error!("Exiting with error: {e}");
    }
    result
}

/// The TUI owns stdout, so log lines go to a file.
fn init_logging(config: &AppConfig) -> Result<(), WicklineError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| {
            WicklineError::Io(format!(
                "failed to open log file {}: {e}",
                config.log_file.display()
            ))
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(terminal: &mut Tui, config: AppConfig) -> Result<(), WicklineError> {
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel();
    let mut manager = SessionManager::new(
        config.feed.websocket_url,
        WsTransport::new(feed_tx),
        JsonFileStorage::new(config.storage.snapshot_path),
    );

    let default_key = config.selection.default_key();
    let mut app = App::new(Selection::new(
        config.selection.symbols,
        config.selection.default_interval,
    ));
    manager.on_selection_changed(default_key, &mut app.chart);

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx, TICK_INTERVAL_MS);

    info!("Chart started");

    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, &app))
            .map_err(|e| WicklineError::Io(format!("failed to draw: {e}")))?;

        tokio::select! {
            Some(message) = rx.recv() => {
                match update(&mut app, message) {
                    Some(Action::Select(key)) => {
                        manager.on_selection_changed(key, &mut app.chart);
                    }
                    Some(Action::Reconnect) => {
                        manager.reconnect(&mut app.chart);
                    }
                    None => {}
                }
            }
            Some(event) = feed_rx.recv() => {
                if let FeedEvent::Closed { session, reason: CloseReason::Error(e) } = &event
                    && manager.active_id() == Some(*session)
                {
                    app.show_error(format!("Stream error: {e}"));
                }
                manager.on_feed_event(event, &mut app.chart);
            }
            else => break,
        }
    }

    manager.shutdown();
    info!("Chart stopped");
    Ok(())
}
