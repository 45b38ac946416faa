//! Crate-level error types.
//!
//! [`WicklineError`] unifies every error source (configuration, WebSocket,
//! JSON, feed decoding, storage) behind a single enum so callers can match
//! on the variant they care about while still using the `?` operator.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WicklineError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum WicklineError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A feed message did not have the expected kline shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Terminal setup or teardown failed.
    #[error("io error: {0}")]
    Io(String),

    /// The snapshot file could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}
