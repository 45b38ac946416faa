//! Top-level controller for the live session.

use tracing::{debug, info, warn};

use super::{SessionId, SessionState, StreamSession};
use crate::models::SeriesKey;
use crate::persistence::SnapshotStorage;
use crate::sink::DisplaySink;
use crate::store::SeriesStore;
use crate::websocket::{FeedEvent, Transport};

/// Owns the series store and at most one [`StreamSession`].
///
/// A new session is only opened after the previous one has been closed,
/// so there is never more than one writer to the store.
pub struct SessionManager<T, S> {
    base_url: String,
    transport: T,
    storage: S,
    store: SeriesStore,
    active: Option<StreamSession>,
    next_id: u64,
}

impl<T: Transport, S: SnapshotStorage> SessionManager<T, S> {
    /// Creates the manager and restores the store from `storage`.
    ///
    /// This is the only time the snapshot is read.
    pub fn new(base_url: impl Into<String>, transport: T, mut storage: S) -> Self {
        let mut store = SeriesStore::new();
        store.replace_all(storage.load());
        info!(
            series = store.series_count(),
            bars = store.bar_count(),
            "Series store restored"
        );

        Self {
            base_url: base_url.into(),
            transport,
            storage,
            store,
            active: None,
            next_id: 1,
        }
    }

    /// Switches the live session to `key`.
    ///
    /// Closes the current session, re-seeds `sink` with the stored history
    /// for `key` (empty on a cold start) and opens a new session.
    pub fn on_selection_changed<D: DisplaySink + ?Sized>(
        &mut self,
        key: SeriesKey,
        sink: &mut D,
    ) -> SessionId {
        if let Some(mut previous) = self.active.take() {
            previous.close();
        }

        let history = self.store.get(&key);
        info!(%key, bars = history.len(), "Selection changed");
        sink.initialize(&key, history);

        let id = SessionId::new(self.next_id);
        self.next_id += 1;

        let session = StreamSession::open(id, key, &self.base_url, &mut self.transport);
        sink.connection_changed(session.state());
        self.active = Some(session);

        id
    }

    /// Opens a fresh session for the current key, if there is one.
    pub fn reconnect<D: DisplaySink + ?Sized>(&mut self, sink: &mut D) -> Option<SessionId> {
        let key = self.active_key()?.clone();
        info!(%key, "Reconnecting");
        Some(self.on_selection_changed(key, sink))
    }

    /// Routes a transport event to the session it belongs to.
    ///
    /// Events tagged with any id other than the active session's come from
    /// a closed session and are dropped. Malformed messages are logged and
    /// dropped without affecting the session.
    pub fn on_feed_event<D: DisplaySink + ?Sized>(&mut self, event: FeedEvent, sink: &mut D) {
        let Some(session) = self
            .active
            .as_mut()
            .filter(|session| session.id() == event.session())
        else {
            debug!(session = %event.session(), "Discarding event from inactive session");
            return;
        };

        match event {
            FeedEvent::Opened { .. } => {
                session.mark_open();
                sink.connection_changed(session.state());
            }
            FeedEvent::Message { payload, .. } => {
                let was_open = session.state() == SessionState::Open;
                let outcome =
                    session.handle_message(&payload, &mut self.store, &mut self.storage, sink);
                if let Err(e) = outcome {
                    warn!(
                        session = %session.id(),
                        key = %session.key(),
                        "Dropping message: {e}"
                    );
                }
                if !was_open && session.state() == SessionState::Open {
                    sink.connection_changed(SessionState::Open);
                }
            }
            FeedEvent::Closed { reason, .. } => {
                session.on_transport_closed(&reason);
                sink.connection_changed(session.state());
            }
        }
    }

    /// Closes the active session.
    pub fn shutdown(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.close();
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Key of the live session, if one exists.
    pub fn active_key(&self) -> Option<&SeriesKey> {
        self.active.as_ref().map(StreamSession::key)
    }

    /// State of the live session, if one exists.
    pub fn active_state(&self) -> Option<SessionState> {
        self.active.as_ref().map(StreamSession::state)
    }

    /// Id of the live session, if one exists.
    pub fn active_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(StreamSession::id)
    }
}
