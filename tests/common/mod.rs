//! Shared test utilities: a recording display sink, a scripted transport
//! and kline message builders.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;

use wickline::models::{Bar, Interval, SeriesKey, Symbol};
use wickline::session::{SessionId, SessionState};
use wickline::sink::DisplaySink;
use wickline::websocket::{Connection, Transport};

/// Base URL handed to the session manager in tests.
pub const TEST_BASE_URL: &str = "wss://stream.test/ws";

/// Public Binance stream endpoint.
pub const BINANCE_WS_URL: &str = "wss://stream.binance.com:9443/ws";

pub fn key(symbol: &str, interval: Interval) -> SeriesKey {
    SeriesKey::new(Symbol::new(symbol).expect("valid symbol"), interval)
}

pub fn bar(open_time: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Bar {
    Bar {
        open_time,
        open,
        high,
        low,
        close,
    }
}

/// Builds a kline stream message the way Binance sends it.
pub fn kline_message(bar: &Bar, is_final: bool) -> String {
    serde_json::json!({
        "e": "kline",
        "E": bar.open_time + 1_500,
        "s": "ETHUSDT",
        "k": {
            "t": bar.open_time,
            "T": bar.open_time + 59_999,
            "s": "ETHUSDT",
            "i": "1m",
            "o": bar.open.to_string(),
            "h": bar.high.to_string(),
            "l": bar.low.to_string(),
            "c": bar.close.to_string(),
            "v": "10.0",
            "n": 12,
            "x": is_final,
        }
    })
    .to_string()
}

/// Everything a [`RecordingSink`] was told, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Initialize(SeriesKey, Vec<Bar>),
    Append(Bar),
    Connection(SessionState),
}

/// A display sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appended(&self) -> Vec<&Bar> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Append(bar) => Some(bar),
                _ => None,
            })
            .collect()
    }

    pub fn initializations(&self) -> Vec<(&SeriesKey, &[Bar])> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Initialize(key, bars) => Some((key, bars.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn last_connection(&self) -> Option<SessionState> {
        self.calls.iter().rev().find_map(|call| match call {
            SinkCall::Connection(state) => Some(*state),
            _ => None,
        })
    }
}

impl DisplaySink for RecordingSink {
    fn initialize(&mut self, key: &SeriesKey, series: &[Bar]) {
        self.calls
            .push(SinkCall::Initialize(key.clone(), series.to_vec()));
    }

    fn append_bar(&mut self, bar: &Bar) {
        self.calls.push(SinkCall::Append(bar.clone()));
    }

    fn connection_changed(&mut self, state: SessionState) {
        self.calls.push(SinkCall::Connection(state));
    }
}

/// What a [`ScriptedTransport`] was asked to do.
#[derive(Debug, Default)]
pub struct TransportLog {
    /// `(session, url)` for every opened connection.
    pub opened: Vec<(SessionId, String)>,
    /// Sessions whose connection was closed, once per close call.
    pub closed: Vec<SessionId>,
}

impl TransportLog {
    /// Sessions opened but never closed.
    pub fn live(&self) -> Vec<SessionId> {
        self.opened
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !self.closed.contains(id))
            .collect()
    }
}

/// A transport that opens no sockets; tests feed events by hand.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    log: Rc<RefCell<TransportLog>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the log that stays valid after the transport moves.
    pub fn log(&self) -> Rc<RefCell<TransportLog>> {
        Rc::clone(&self.log)
    }
}

impl Transport for ScriptedTransport {
    fn open(&mut self, url: &str, session: SessionId) -> Box<dyn Connection> {
        self.log.borrow_mut().opened.push((session, url.to_string()));
        Box::new(ScriptedConnection {
            session,
            log: Rc::clone(&self.log),
        })
    }
}

struct ScriptedConnection {
    session: SessionId,
    log: Rc<RefCell<TransportLog>>,
}

impl Connection for ScriptedConnection {
    fn close(&mut self) {
        self.log.borrow_mut().closed.push(self.session);
    }
}
