//! Live Binance stream tests.
//!
//! These tests connect to the public Binance stream and require network access.
//! Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use wickline::codec::decode;
use wickline::models::Interval;
use wickline::persistence::MemoryStorage;
use wickline::session::{SessionManager, SessionState};
use wickline::tls::install_crypto_provider;
use wickline::websocket::{FeedEvent, WsTransport, connect, stream_url};

use common::{BINANCE_WS_URL, RecordingSink, key};

#[tokio::test]
async fn test_connect_to_kline_stream() {
    install_crypto_provider();
    let url = stream_url(BINANCE_WS_URL, &key("ethusdt", Interval::S1));

    let result = connect(&url).await;
    assert!(result.is_ok(), "Failed to connect to Binance kline stream");
}

#[tokio::test]
async fn test_receive_decodable_kline() {
    install_crypto_provider();
    let url = stream_url(BINANCE_WS_URL, &key("ethusdt", Interval::S1));
    let (_write, mut read) = connect(&url).await.expect("Failed to connect");

    let timeout = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(msg) = read.next().await {
            if let Ok(tungstenite::Message::Text(text)) = msg {
                return Some(text.as_str().to_owned());
            }
        }
        None
    });

    let payload = timeout
        .await
        .expect("Timeout waiting for kline")
        .expect("Stream ended before a kline arrived");
    assert!(decode(&payload).is_ok(), "Undecodable kline: {payload}");
}

#[tokio::test]
async fn test_session_opens_and_receives_messages() {
    install_crypto_provider();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut manager =
        SessionManager::new(BINANCE_WS_URL, WsTransport::new(tx), MemoryStorage::new());
    let mut sink = RecordingSink::new();
    let id = manager.on_selection_changed(key("btcusdt", Interval::S1), &mut sink);

    let timeout = tokio::time::timeout(Duration::from_secs(10), async {
        let mut messages = 0;
        while let Some(event) = rx.recv().await {
            assert_eq!(event.session(), id);
            let is_message = matches!(event, FeedEvent::Message { .. });
            manager.on_feed_event(event, &mut sink);
            if is_message {
                messages += 1;
                if messages == 2 {
                    return true;
                }
            }
        }
        false
    });

    assert!(
        timeout.await.expect("Timeout waiting for kline messages"),
        "Feed channel closed early"
    );
    assert_eq!(manager.active_state(), Some(SessionState::Open));

    manager.shutdown();
}
