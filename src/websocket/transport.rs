//! Transport connections for stream sessions.
//!
//! Each [`WsConnection`] runs its socket in a dedicated task. The task never
//! touches engine state; it only forwards [`FeedEvent`]s, tagged with the
//! owning session's id, to the main loop over an unbounded channel.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use tungstenite::Message;

use super::connect;
use crate::session::SessionId;

/// Why a transport connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The server sent a close frame.
    Remote(Option<String>),
    /// Connecting, reading or the handshake failed.
    Error(String),
    /// The stream ended without a close frame.
    EndOfStream,
}

/// Notifications from a transport connection, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The connection is established and messages may follow.
    Opened { session: SessionId },
    /// A text frame from the feed.
    Message { session: SessionId, payload: String },
    /// The connection ended on its own.
    Closed {
        session: SessionId,
        reason: CloseReason,
    },
}

impl FeedEvent {
    /// The session this event belongs to.
    pub fn session(&self) -> SessionId {
        match self {
            FeedEvent::Opened { session }
            | FeedEvent::Message { session, .. }
            | FeedEvent::Closed { session, .. } => *session,
        }
    }
}

/// A live connection that can be released.
pub trait Connection {
    /// Releases the connection. Calling it more than once is harmless.
    fn close(&mut self);
}

/// Opens connections on behalf of stream sessions.
pub trait Transport {
    /// Starts connecting to `url`; events are tagged with `session`.
    fn open(&mut self, url: &str, session: SessionId) -> Box<dyn Connection>;
}

/// WebSocket transport delivering events to a single channel.
#[derive(Debug, Clone)]
pub struct WsTransport {
    events: mpsc::UnboundedSender<FeedEvent>,
}

impl WsTransport {
    /// Creates a transport whose connections report to `events`.
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<FeedEvent>) -> Self {
        Self { events }
    }
}

impl Transport for WsTransport {
    fn open(&mut self, url: &str, session: SessionId) -> Box<dyn Connection> {
        Box::new(WsConnection::spawn(
            url.to_string(),
            session,
            self.events.clone(),
        ))
    }
}

/// Handle to a connection task.
///
/// Closing sends a shutdown signal; the task then sends a close frame and
/// exits. Dropping the handle closes it.
#[derive(Debug)]
pub struct WsConnection {
    shutdown: Option<oneshot::Sender<()>>,
}

impl WsConnection {
    /// Spawns the connection task on the current tokio runtime.
    pub fn spawn(
        url: String,
        session: SessionId,
        events: mpsc::UnboundedSender<FeedEvent>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(run_connection(url, session, events, shutdown_rx));

        Self {
            shutdown: Some(shutdown_tx),
        }
    }
}

impl Connection for WsConnection {
    fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already have exited on its own.
            let _ = shutdown.send(());
        }
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Connects, then forwards text frames until the stream ends or shutdown
/// is requested.
async fn run_connection(
    url: String,
    session: SessionId,
    events: mpsc::UnboundedSender<FeedEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    info!(%session, url = %url, "Connecting to kline stream");

    let connected = tokio::select! {
        result = connect(&url) => result,
        _ = &mut shutdown => {
            debug!(%session, "Connection released before handshake");
            return;
        }
    };

    let (mut write, mut read) = match connected {
        Ok(pair) => pair,
        Err(e) => {
            warn!(%session, "Connection failed: {e}");
            let _ = events.send(FeedEvent::Closed {
                session,
                reason: CloseReason::Error(e.to_string()),
            });
            return;
        }
    };

    if events.send(FeedEvent::Opened { session }).is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = read.next() => {
                let reason = match msg {
                    Some(Ok(Message::Text(text))) => {
                        let event = FeedEvent::Message {
                            session,
                            payload: text.as_str().to_owned(),
                        };
                        if events.send(event).is_err() {
                            // Main loop is gone, nothing left to report to.
                            return;
                        }
                        continue;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        CloseReason::Remote(frame.map(|f| f.reason.as_str().to_owned()))
                    }
                    Some(Ok(_)) => continue, // Binary/Ping/Pong frames
                    Some(Err(e)) => {
                        warn!(%session, "WebSocket error: {e}");
                        CloseReason::Error(e.to_string())
                    }
                    None => CloseReason::EndOfStream,
                };

                info!(%session, ?reason, "Kline stream ended");
                let _ = events.send(FeedEvent::Closed { session, reason });
                return;
            }

            _ = &mut shutdown => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    debug!(%session, "Close frame not sent: {e}");
                }
                debug!(%session, "Connection released");
                return;
            }
        }
    }
}
