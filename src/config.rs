//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `WICKLINE_WEBSOCKET_URL`: stream endpoint base (default Binance public streams)
//! - `WICKLINE_SNAPSHOT_PATH`: JSON file the series store is persisted to
//! - `WICKLINE_SYMBOLS`: comma-separated symbols offered by the symbol selector
//! - `WICKLINE_DEFAULT_INTERVAL`: interval selected at startup
//! - `WICKLINE_LOG_FILE`: file receiving `tracing` output
//!
//! Empty values are treated as absent.

use std::path::PathBuf;

use crate::models::{Interval, SeriesKey, Symbol};
use crate::websocket::DEFAULT_STREAM_URL;

const DEFAULT_SNAPSHOT_PATH: &str = "candlestick_data.json";
const DEFAULT_SYMBOLS: &str = "ethusdt,btcusdt,bnbusdt,solusdt,xrpusdt";
const DEFAULT_LOG_FILE: &str = "wickline.log";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub storage: StorageConfig,
    pub selection: SelectionConfig,
    pub log_file: PathBuf,
}

/// Kline stream connection settings.
#[derive(Debug)]
pub struct FeedConfig {
    pub websocket_url: String,
}

/// Snapshot persistence settings.
#[derive(Debug)]
pub struct StorageConfig {
    pub snapshot_path: PathBuf,
}

/// Choices offered by the selectors and the initial selection.
#[derive(Debug)]
pub struct SelectionConfig {
    /// Never empty; the first entry is selected at startup.
    pub symbols: Vec<Symbol>,
    pub default_interval: Interval,
}

impl SelectionConfig {
    /// The key the first session is opened for.
    pub fn default_key(&self) -> SeriesKey {
        SeriesKey::new(self.symbols[0].clone(), self.default_interval)
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`WicklineError::Config`](crate::WicklineError::Config) if a
/// symbol in `WICKLINE_SYMBOLS` is invalid, the list is empty after
/// parsing, or `WICKLINE_DEFAULT_INTERVAL` is not a known interval.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let websocket_url =
        non_empty_var("WICKLINE_WEBSOCKET_URL").unwrap_or_else(|| DEFAULT_STREAM_URL.to_string());

    let snapshot_path = non_empty_var("WICKLINE_SNAPSHOT_PATH")
        .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string())
        .into();

    let symbols = parse_symbols(
        &non_empty_var("WICKLINE_SYMBOLS").unwrap_or_else(|| DEFAULT_SYMBOLS.to_string()),
    )?;

    let default_interval = match non_empty_var("WICKLINE_DEFAULT_INTERVAL") {
        Some(raw) => raw.trim().parse()?,
        None => Interval::default(),
    };

    let log_file = non_empty_var("WICKLINE_LOG_FILE")
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
        .into();

    Ok(AppConfig {
        feed: FeedConfig { websocket_url },
        storage: StorageConfig { snapshot_path },
        selection: SelectionConfig {
            symbols,
            default_interval,
        },
        log_file,
    })
}

/// Parses a comma-separated symbol list, dropping blanks and duplicates.
fn parse_symbols(raw: &str) -> crate::Result<Vec<Symbol>> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for part in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let symbol = Symbol::new(part)?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(crate::WicklineError::Config(
            "WICKLINE_SYMBOLS does not name any symbol".to_string(),
        ));
    }
    Ok(symbols)
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
