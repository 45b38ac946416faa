//! The display side of the engine.

use crate::models::{Bar, SeriesKey};
use crate::session::SessionState;

/// Consumes series data for display.
///
/// The sink never owns the stored series: it receives a borrowed copy on
/// [`initialize`](DisplaySink::initialize) and single bars afterwards.
pub trait DisplaySink {
    /// Replaces the displayed dataset with `series` for `key`.
    fn initialize(&mut self, key: &SeriesKey, series: &[Bar]);

    /// Appends one bar to the displayed dataset and requests a redraw.
    fn append_bar(&mut self, bar: &Bar);

    /// Called whenever the active session changes state.
    fn connection_changed(&mut self, _state: SessionState) {}
}
