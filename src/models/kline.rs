//! Binance kline stream models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// An event from a `<symbol>@kline_<interval>` stream.
#[derive(Debug, Clone, Deserialize)]
pub struct KlineEvent {
    #[serde(rename = "e", default)]
    pub event_type: Option<String>,
    #[serde(rename = "E", default)]
    pub event_time: Option<i64>,
    #[serde(rename = "s", default)]
    pub symbol: Option<String>,
    #[serde(rename = "k")]
    pub kline: KlineData,
}

/// The candlestick carried by a [`KlineEvent`].
#[derive(Debug, Clone, Deserialize)]
pub struct KlineData {
    /// Start of the candle's window, epoch milliseconds.
    #[serde(rename = "t")]
    pub open_time: i64,
    #[serde(rename = "T", default)]
    pub close_time: Option<i64>,
    #[serde(rename = "s", default)]
    pub symbol: Option<String>,
    #[serde(rename = "i", default)]
    pub interval: Option<String>,
    #[serde(rename = "o", with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(rename = "h", with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(rename = "l", with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(rename = "c", with = "rust_decimal::serde::str")]
    pub close: Decimal,
    /// Whether this candle's window has closed.
    #[serde(rename = "x")]
    pub is_final: bool,
}
