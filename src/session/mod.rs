//! Live stream sessions.
//!
//! - [`stream`] - One connection bound to one series key
//! - [`manager`] - Owns the store and swaps sessions on selection changes

mod manager;
mod stream;

use std::fmt;

pub use manager::SessionManager;
pub use stream::{MessageOutcome, StreamSession};

/// Process-unique identifier of a stream session.
///
/// Transport events carry the id of the session that opened the
/// connection, so events from a replaced session can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a [`StreamSession`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Connecting,
    Open,
    Closed,
}

impl SessionState {
    /// Returns a display string for the state.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Connecting => "Connecting...",
            SessionState::Open => "Online",
            SessionState::Closed => "Offline",
        }
    }
}
