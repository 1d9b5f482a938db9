//! JSON codec for inbound phone frames.
//!
//! Decoding is a two-step affair: `serde_json` reads the bytes into a
//! [`WireMessage`], then the `type` tag picks the [`InboundEvent`] variant.
//! Only the first step can fail.  An unknown tag is a successful decode that
//! yields [`InboundEvent::Unrecognized`].

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::trace;

use crate::protocol::messages::{InboundEvent, WireMessage};

/// Errors that can occur while decoding an inbound frame.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The frame carried no bytes at all.
    #[error("empty frame")]
    EmptyFrame,

    /// The frame is not a JSON object with correctly typed fields.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Decodes one WebSocket frame into an [`InboundEvent`].
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyFrame`] for a zero-length frame and
/// [`ProtocolError::MalformedPayload`] when the bytes are not valid JSON, not
/// a JSON object (arrays included), or carry a field of the wrong type
/// (e.g. `"dx":"fast"`).
///
/// # Examples
///
/// ```rust
/// use touchpad_core::protocol::{decode_event, InboundEvent};
///
/// let event = decode_event(br#"{"type":"Move","dx":2,"dy":-1.5}"#).unwrap();
/// assert_eq!(event, InboundEvent::Move { dx: 2.0, dy: -1.5 });
/// ```
pub fn decode_event(bytes: &[u8]) -> Result<InboundEvent, ProtocolError> {
    if bytes.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }

    // Frames must be objects; the derived decoder alone also binds arrays
    // to fields by position.
    let object: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;
    let wire = WireMessage::deserialize(Value::Object(object))
        .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;
    trace!(?wire, "decoded wire message");

    Ok(InboundEvent::from(wire))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
