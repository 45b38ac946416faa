//! Live candlestick recorder for Binance kline streams.
//!
//! Keeps one stream session per selected (symbol, interval) key, stores
//! every finalized bar in an append-only series, writes the whole store
//! through to a JSON snapshot, and feeds a display sink.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod session;
pub mod sink;
pub mod store;
pub mod tls;
pub mod tui;
pub mod websocket;

pub use error::{Result, WicklineError};
