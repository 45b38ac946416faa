//! In-memory series storage keyed by symbol and interval.
//!
//! The store is append-only: bars are kept in arrival order and are never
//! re-sorted or deduplicated. The feed is trusted to deliver strictly
//! increasing open times; a resent bar is stored twice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Bar, Interval, SeriesKey, Symbol};

/// The whole store as written to durable storage.
///
/// Serializes as `{"<symbol>": {"<interval>": [bar, ...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedSnapshot(BTreeMap<Symbol, BTreeMap<Interval, Vec<Bar>>>);

impl PersistedSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Iterates over every stored series.
    pub fn iter(&self) -> impl Iterator<Item = (SeriesKey, &[Bar])> {
        self.0.iter().flat_map(|(symbol, intervals)| {
            intervals.iter().map(|(interval, bars)| {
                (SeriesKey::new(symbol.clone(), *interval), bars.as_slice())
            })
        })
    }
}

/// Owns every stored series.
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: PersistedSnapshot,
}

impl SeriesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the series for `key`, or an empty slice if nothing is stored.
    pub fn get(&self, key: &SeriesKey) -> &[Bar] {
        self.series
            .0
            .get(key.symbol())
            .and_then(|intervals| intervals.get(&key.interval()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends `bar` to the end of the series for `key`, creating it if needed.
    ///
    /// No ordering or duplicate checks are made.
    pub fn append(&mut self, key: &SeriesKey, bar: Bar) {
        self.series
            .0
            .entry(key.symbol().clone())
            .or_default()
            .entry(key.interval())
            .or_default()
            .push(bar);
    }

    /// Replaces the entire contents of the store.
    pub fn replace_all(&mut self, snapshot: PersistedSnapshot) {
        self.series = snapshot;
    }

    /// Full read access for persistence.
    pub fn snapshot(&self) -> &PersistedSnapshot {
        &self.series
    }

    /// Number of (symbol, interval) series holding at least one bar.
    pub fn series_count(&self) -> usize {
        self.series.iter().filter(|(_, bars)| !bars.is_empty()).count()
    }

    /// Total number of bars across all series.
    pub fn bar_count(&self) -> usize {
        self.series.iter().map(|(_, bars)| bars.len()).sum()
    }
}
