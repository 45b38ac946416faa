//! Async WebSocket client for Binance kline streams.
//!
//! This module is organized by concern:
//! - [`transport`] - Connection handles and the tasks that read them

mod transport;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;
use tungstenite::Message;

use crate::Result;
use crate::models::SeriesKey;

pub use transport::{CloseReason, Connection, FeedEvent, Transport, WsConnection, WsTransport};

/// Default public Binance stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/ws";

/// Write half of a stream connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a stream connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Builds the kline stream URL for `key`: `{base}/{symbol}@kline_{interval}`.
pub fn stream_url(base: &str, key: &SeriesKey) -> String {
    format!(
        "{}/{}@kline_{}",
        base.trim_end_matches('/'),
        key.symbol(),
        key.interval()
    )
}

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`WicklineError`](crate::WicklineError) if the connection or TLS handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}
