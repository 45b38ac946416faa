//! Stream URL and transport event tests.

use std::time::Duration;

use tokio::sync::mpsc;

use wickline::models::{Interval, SeriesKey, Symbol};
use wickline::session::SessionId;
use wickline::websocket::{
    CloseReason, DEFAULT_STREAM_URL, FeedEvent, Transport, WsTransport, stream_url,
};

fn key(symbol: &str, interval: Interval) -> SeriesKey {
    SeriesKey::new(Symbol::new(symbol).expect("valid symbol"), interval)
}

#[test]
fn test_stream_url_for_default_endpoint() {
    assert_eq!(
        stream_url(DEFAULT_STREAM_URL, &key("ETHUSDT", Interval::M1)),
        "wss://stream.binance.com:9443/ws/ethusdt@kline_1m"
    );
}

#[test]
fn test_stream_url_uses_interval_wire_names() {
    let cases = [
        (Interval::S1, "1s"),
        (Interval::M15, "15m"),
        (Interval::H12, "12h"),
        (Interval::W1, "1w"),
        (Interval::Mo1, "1M"),
    ];

    for (interval, wire) in cases {
        assert_eq!(
            stream_url("wss://example.test/ws/", &key("btcusdt", interval)),
            format!("wss://example.test/ws/btcusdt@kline_{wire}")
        );
    }
}

#[test]
fn test_feed_event_reports_its_session() {
    let session = SessionId::new(3);
    let events = [
        FeedEvent::Opened { session },
        FeedEvent::Message {
            session,
            payload: "{}".to_string(),
        },
        FeedEvent::Closed {
            session,
            reason: CloseReason::Remote(Some("bye".to_string())),
        },
    ];

    for event in events {
        assert_eq!(event.session(), session);
    }
}

#[tokio::test]
async fn test_refused_connection_reports_closed_with_error() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut transport = WsTransport::new(tx);
    let session = SessionId::new(1);

    let _connection = transport.open("ws://127.0.0.1:1/ws/ethusdt@kline_1m", session);

    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("Timeout waiting for close event")
        .expect("Feed channel closed");
    assert!(
        matches!(
            event,
            FeedEvent::Closed {
                reason: CloseReason::Error(_),
                ..
            }
        ),
        "unexpected event {event:?}"
    );
    assert_eq!(event.session(), session);
}
