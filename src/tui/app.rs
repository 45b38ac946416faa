//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::models::{Bar, Interval, SeriesKey, Symbol};
use crate::session::SessionState;
use crate::sink::DisplaySink;

/// How long an error stays in the status bar.
const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    /// Symbol and interval selectors.
    pub selection: Selection,
    /// The displayed series; the session manager's display sink.
    pub chart: ChartState,
    /// Error message to display (clears after timeout).
    pub error_message: Option<ErrorDisplay>,
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App with the given selector choices.
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            chart: ChartState::default(),
            error_message: None,
            should_quit: false,
        }
    }

    /// Sets an error message to display.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears error messages older than five seconds.
    pub fn clear_stale_errors(&mut self) {
        if let Some(ref error) = self.error_message
            && error.timestamp.elapsed() > ERROR_DISPLAY_DURATION
        {
            self.error_message = None;
        }
    }
}

/// The two independent selectors.
///
/// Both values live side by side, so a change to either one can always
/// produce the complete key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    symbols: Vec<Symbol>,
    symbol_index: usize,
    interval: Interval,
}

impl Selection {
    /// Creates the selectors with the first symbol selected.
    ///
    /// # Panics
    ///
    /// Panics if `symbols` is empty.
    pub fn new(symbols: Vec<Symbol>, interval: Interval) -> Self {
        assert!(!symbols.is_empty(), "selection needs at least one symbol");
        Self {
            symbols,
            symbol_index: 0,
            interval,
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn symbol_index(&self) -> usize {
        self.symbol_index
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbols[self.symbol_index]
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// The key formed by the current value of both selectors.
    pub fn current_key(&self) -> SeriesKey {
        SeriesKey::new(self.symbol().clone(), self.interval)
    }

    /// Moves the symbol selector down, returning the new key if it moved.
    pub fn next_symbol(&mut self) -> Option<SeriesKey> {
        (self.symbol_index + 1 < self.symbols.len()).then(|| {
            self.symbol_index += 1;
            self.current_key()
        })
    }

    /// Moves the symbol selector up, returning the new key if it moved.
    pub fn previous_symbol(&mut self) -> Option<SeriesKey> {
        (self.symbol_index > 0).then(|| {
            self.symbol_index -= 1;
            self.current_key()
        })
    }

    /// Sets the interval selector, returning the new key if it changed.
    pub fn set_interval(&mut self, interval: Interval) -> Option<SeriesKey> {
        (interval != self.interval).then(|| {
            self.interval = interval;
            self.current_key()
        })
    }
}

/// Displayed candlestick data.
#[derive(Clone, Debug, Default)]
pub struct ChartState {
    key: Option<SeriesKey>,
    bars: Vec<Bar>,
    connection: SessionState,
}

impl ChartState {
    /// The key whose series is displayed.
    pub fn key(&self) -> Option<&SeriesKey> {
        self.key.as_ref()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn last_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn connection(&self) -> SessionState {
        self.connection
    }
}

impl DisplaySink for ChartState {
    fn initialize(&mut self, key: &SeriesKey, series: &[Bar]) {
        self.key = Some(key.clone());
        self.bars = series.to_vec();
    }

    fn append_bar(&mut self, bar: &Bar) {
        // The main loop redraws after every event it handles.
        self.bars.push(bar.clone());
    }

    fn connection_changed(&mut self, state: SessionState) {
        self.connection = state;
    }
}

/// Error message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    /// The error message.
    pub message: String,
    /// When the error was shown.
    pub timestamp: Instant,
}
