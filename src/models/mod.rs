//! Shared models for Binance kline streams and the stored series.
//!
//! Contains the addressing types ([`Symbol`], [`Interval`], [`SeriesKey`]),
//! the stored [`bar::Bar`] record and the raw [`kline::KlineEvent`] envelope.

pub mod bar;
pub mod kline;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WicklineError;

pub use bar::Bar;

/// A normalized, lowercase ticker such as `ethusdt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalizes `raw` into a symbol.
    ///
    /// Surrounding whitespace is trimmed and the result lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::Config`] if the symbol is empty or contains
    /// anything other than ASCII letters and digits, since it ends up in
    /// the stream URL path.
    pub fn new(raw: &str) -> crate::Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(WicklineError::Config("symbol must not be empty".to_string()));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(WicklineError::Config(format!(
                "symbol {raw:?} may only contain ASCII letters and digits"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = WicklineError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = WicklineError;

    fn try_from(raw: String) -> crate::Result<Self> {
        Self::new(&raw)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Binance kline intervals.
///
/// The wire name is case-sensitive: `1m` is one minute, `1M` one month.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Interval {
    #[serde(rename = "1s")]
    S1,
    #[default]
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "8h")]
    H8,
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "3d")]
    D3,
    #[serde(rename = "1w")]
    W1,
    #[serde(rename = "1M")]
    Mo1,
}

impl Interval {
    /// Every interval, shortest first.
    pub const ALL: [Interval; 16] = [
        Interval::S1,
        Interval::M1,
        Interval::M3,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H2,
        Interval::H4,
        Interval::H6,
        Interval::H8,
        Interval::H12,
        Interval::D1,
        Interval::D3,
        Interval::W1,
        Interval::Mo1,
    ];

    /// Returns the wire-format name used in stream URLs and snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::S1 => "1s",
            Interval::M1 => "1m",
            Interval::M3 => "3m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H2 => "2h",
            Interval::H4 => "4h",
            Interval::H6 => "6h",
            Interval::H8 => "8h",
            Interval::H12 => "12h",
            Interval::D1 => "1d",
            Interval::D3 => "3d",
            Interval::W1 => "1w",
            Interval::Mo1 => "1M",
        }
    }

    /// The next longer interval, wrapping around to the shortest.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    /// The next shorter interval, wrapping around to the longest.
    pub fn previous(self) -> Self {
        let pos = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[pos.checked_sub(1).unwrap_or(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = WicklineError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| WicklineError::Config(format!("unknown kline interval {s:?}")))
    }
}

/// Addresses one stored series and the live session feeding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    symbol: Symbol,
    interval: Interval,
}

impl SeriesKey {
    #[must_use]
    pub fn new(symbol: Symbol, interval: Interval) -> Self {
        Self { symbol, interval }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_trimmed_and_lowercased() {
        let symbol = Symbol::new("  ETHUSDT ").unwrap();
        assert_eq!(symbol.as_str(), "ethusdt");
    }

    #[test]
    fn symbol_rejects_empty_and_path_characters() {
        assert!(Symbol::new("   ").is_err());
        assert!(Symbol::new("eth/usdt").is_err());
        assert!(Symbol::new("eth@kline").is_err());
    }

    #[test]
    fn interval_parse_is_case_sensitive() {
        assert_eq!("1m".parse::<Interval>().unwrap(), Interval::M1);
        assert_eq!("1M".parse::<Interval>().unwrap(), Interval::Mo1);
        assert!("2m".parse::<Interval>().is_err());
    }

    #[test]
    fn interval_names_round_trip_through_from_str() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
    }

    #[test]
    fn interval_cycles_wrap_around() {
        assert_eq!(Interval::Mo1.next(), Interval::S1);
        assert_eq!(Interval::S1.previous(), Interval::Mo1);
        assert_eq!(Interval::M1.next(), Interval::M3);
    }

    #[test]
    fn keys_differ_when_either_field_differs() {
        let eth = Symbol::new("ethusdt").unwrap();
        let btc = Symbol::new("btcusdt").unwrap();
        let a = SeriesKey::new(eth.clone(), Interval::M1);

        assert_eq!(a, SeriesKey::new(eth.clone(), Interval::M1));
        assert_ne!(a, SeriesKey::new(eth, Interval::M5));
        assert_ne!(a, SeriesKey::new(btc, Interval::M1));
    }
}
