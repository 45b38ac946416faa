//! Decoding tests for Binance kline stream messages.

use rust_decimal_macros::dec;

use wickline::WicklineError;
use wickline::codec::{Decoded, decode};
use wickline::models::kline::KlineEvent;

const KLINE_FINAL_JSON: &str = include_str!("fixtures/kline_final.json");
const KLINE_FORMING_JSON: &str = include_str!("fixtures/kline_forming.json");

#[test]
fn test_kline_event_deserializes() {
    let event: KlineEvent =
        serde_json::from_str(KLINE_FINAL_JSON).expect("Failed to deserialize kline event");

    assert_eq!(event.event_type.as_deref(), Some("kline"));
    assert_eq!(event.event_time, Some(1672515782136));
    assert_eq!(event.symbol.as_deref(), Some("ETHUSDT"));
    assert_eq!(event.kline.open_time, 1672515780000);
    assert_eq!(event.kline.close_time, Some(1672515839999));
    assert_eq!(event.kline.interval.as_deref(), Some("1m"));
    assert_eq!(event.kline.high, dec!(2452.00));
    assert!(event.kline.is_final);
}

#[test]
fn test_final_kline_decodes_to_bar() {
    let Decoded::Bar(bar) = decode(KLINE_FINAL_JSON).expect("Failed to decode kline") else {
        panic!("finalized kline was rejected");
    };

    assert_eq!(bar.open_time, 1672515780000);
    assert_eq!(bar.open, dec!(2450.10));
    assert_eq!(bar.high, dec!(2452.00));
    assert_eq!(bar.low, dec!(2449.80));
    assert_eq!(bar.close, dec!(2451.30));
    assert!(bar.is_bullish());
}

#[test]
fn test_price_scale_survives_decoding() {
    let Decoded::Bar(bar) = decode(KLINE_FINAL_JSON).expect("Failed to decode kline") else {
        panic!("finalized kline was rejected");
    };

    assert_eq!(bar.open.to_string(), "2450.10");
    assert_eq!(bar.high.to_string(), "2452.00");
}

#[test]
fn test_forming_kline_is_rejected() {
    let decoded = decode(KLINE_FORMING_JSON).expect("Failed to decode kline");
    assert_eq!(decoded, Decoded::Rejected);
}

#[test]
fn test_malformed_payloads_are_errors() {
    let cases = [
        "",
        "not json",
        r#"{"e":"kline","E":1,"s":"ETHUSDT"}"#,
        r#"{"k":{"t":1000,"o":"1","h":"1","l":"1","c":"1"}}"#,
        r#"{"k":{"t":"soon","o":"1","h":"1","l":"1","c":"1","x":true}}"#,
        r#"{"k":{"t":1000,"o":"one","h":"1","l":"1","c":"1","x":true}}"#,
    ];

    for raw in cases {
        assert!(
            matches!(decode(raw), Err(WicklineError::MalformedMessage(_))),
            "expected a malformed message error for {raw:?}"
        );
    }
}

#[test]
fn test_minimal_kline_decodes() {
    let raw = r#"{"k":{"t":1000,"o":"10","h":"12","l":"9","c":"11","x":true}}"#;

    let decoded = decode(raw).expect("Failed to decode minimal kline");

    let Decoded::Bar(bar) = decoded else {
        panic!("finalized kline was rejected");
    };
    assert_eq!(bar.open_time, 1000);
    assert_eq!(bar.close, dec!(11));
}
