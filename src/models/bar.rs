//! The stored OHLC bar.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One finalized candlestick.
///
/// Prices keep the scale the feed sent them with (`"10.50"` stays
/// `10.50`) and are written back out as strings. Field names are the
/// compact `t`/`o`/`h`/`l`/`c` keys used in the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the bar's window, epoch milliseconds.
    #[serde(rename = "t")]
    pub open_time: i64,
    #[serde(rename = "o", with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(rename = "h", with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(rename = "l", with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(rename = "c", with = "rust_decimal::serde::str")]
    pub close: Decimal,
}

impl Bar {
    /// Returns `true` when the bar closed at or above its open.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}
