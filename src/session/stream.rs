//! A single live subscription bound to one series key.

use tracing::{debug, info, trace};

use super::{SessionId, SessionState};
use crate::Result;
use crate::codec::{self, Decoded};
use crate::models::SeriesKey;
use crate::persistence::SnapshotStorage;
use crate::sink::DisplaySink;
use crate::store::SeriesStore;
use crate::websocket::{CloseReason, Connection, Transport, stream_url};

/// What a feed message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A finalized bar was stored, saved and shown.
    Appended,
    /// The bar was still forming; nothing changed.
    Rejected,
    /// The session is closed; the message was not looked at.
    Ignored,
}

/// Owns one transport connection for exactly one [`SeriesKey`].
///
/// Moves through `Connecting -> Open -> Closed`. Once closed it stays
/// closed and discards any message still in flight.
pub struct StreamSession {
    id: SessionId,
    key: SeriesKey,
    url: String,
    state: SessionState,
    connection: Option<Box<dyn Connection>>,
}

impl StreamSession {
    /// Opens a connection to the kline stream for `key`.
    pub fn open<T: Transport + ?Sized>(
        id: SessionId,
        key: SeriesKey,
        base_url: &str,
        transport: &mut T,
    ) -> Self {
        let url = stream_url(base_url, &key);
        info!(session = %id, %key, url = %url, "Opening stream session");
        let connection = transport.open(&url, id);

        Self {
            id,
            key,
            url,
            state: SessionState::Connecting,
            connection: Some(connection),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Records that the transport finished its handshake.
    pub fn mark_open(&mut self) {
        if self.state == SessionState::Connecting {
            self.state = SessionState::Open;
            info!(session = %self.id, key = %self.key, "Stream session open");
        }
    }

    /// Processes one feed message.
    ///
    /// A finalized bar is appended to `store`, the full store is written
    /// through to `storage`, and then the bar is handed to `sink`, in that
    /// order. Forming bars have no effect.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::MalformedMessage`](crate::WicklineError::MalformedMessage)
    /// if the message cannot be decoded. The session stays usable.
    pub fn handle_message<S, D>(
        &mut self,
        raw: &str,
        store: &mut SeriesStore,
        storage: &mut S,
        sink: &mut D,
    ) -> Result<MessageOutcome>
    where
        S: SnapshotStorage + ?Sized,
        D: DisplaySink + ?Sized,
    {
        if self.state == SessionState::Closed {
            trace!(session = %self.id, "Dropping message for closed session");
            return Ok(MessageOutcome::Ignored);
        }
        // A message can only follow a completed handshake.
        self.mark_open();

        let bar = match codec::decode(raw)? {
            Decoded::Bar(bar) => bar,
            Decoded::Rejected => {
                trace!(session = %self.id, "Skipping forming bar");
                return Ok(MessageOutcome::Rejected);
            }
        };

        debug!(
            session = %self.id,
            key = %self.key,
            open_time = bar.open_time,
            open = %bar.open,
            high = %bar.high,
            low = %bar.low,
            close = %bar.close,
            "New bar"
        );

        store.append(&self.key, bar.clone());
        storage.save(store.snapshot());
        sink.append_bar(&bar);

        Ok(MessageOutcome::Appended)
    }

    /// Closes the session and releases its connection.
    ///
    /// Closing an already closed session does nothing.
    pub fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
            info!(session = %self.id, key = %self.key, "Stream session closed");
        }
        self.state = SessionState::Closed;
    }

    /// Records that the transport ended on its own.
    pub fn on_transport_closed(&mut self, reason: &CloseReason) {
        if self.state != SessionState::Closed {
            info!(session = %self.id, key = %self.key, ?reason, "Transport closed");
        }
        self.connection = None;
        self.state = SessionState::Closed;
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("url", &self.url)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
