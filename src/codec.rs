//! Decoding of raw kline stream messages into stored bars.
//!
//! The only filter applied here is finalization: a kline whose window is
//! still open is [`Decoded::Rejected`]. Anything that does not have the
//! kline shape is an error for the caller to handle.

use crate::Result;
use crate::error::WicklineError;
use crate::models::Bar;
use crate::models::kline::{KlineData, KlineEvent};

/// Outcome of decoding one feed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A finalized bar, ready to be stored.
    Bar(Bar),
    /// The bar is still forming and must not be stored or rendered.
    Rejected,
}

/// Decodes a raw text frame from a kline stream.
///
/// # Errors
///
/// Returns [`WicklineError::MalformedMessage`] if the text is not JSON,
/// lacks the `k` payload, or any of `t`, `o`, `h`, `l`, `c`, `x` is missing
/// or has the wrong type.
pub fn decode(raw: &str) -> Result<Decoded> {
    let event: KlineEvent =
        serde_json::from_str(raw).map_err(|e| WicklineError::MalformedMessage(e.to_string()))?;

    Ok(decode_event(event))
}

/// Applies the finalization filter to an already parsed event.
pub fn decode_event(event: KlineEvent) -> Decoded {
    let KlineData {
        open_time,
        open,
        high,
        low,
        close,
        is_final,
        ..
    } = event.kline;

    if !is_final {
        return Decoded::Rejected;
    }

    Decoded::Bar(Bar {
        open_time,
        open,
        high,
        low,
        close,
    })
}
