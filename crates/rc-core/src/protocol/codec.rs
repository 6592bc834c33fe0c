//! JSON frame codec for the remote-control protocol.
//!
//! Wire format (one JSON object per endpoint message):
//! ```text
//! { "name": "remote-control-protocol", "type": "<event-kind>", "x"?: number, "y"?: number }
//! ```
//! `x`/`y` are present only for `pointer-move`, `pointer-down` and `pointer-up`,
//! each a float in `[0, 1]`.
//!
//! # Text envelope
//!
//! The companion mobile application only listens for the host's generic text
//! messages, so frames bound for it are serialized to a string and wrapped:
//! ```text
//! { "name": "endpoint-text-message", "text": "{\"name\":\"remote-control-protocol\",...}" }
//! ```
//! [`decode_frame`] accepts both shapes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::surface::NormalizedPoint;
use crate::protocol::messages::{ControlEvent, EventKind, PROTOCOL_NAME, TEXT_MESSAGE_NAME};

/// Errors that can occur during frame encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The payload is not a JSON object with a string `name`.
    #[error("frame has no name field")]
    MissingName,

    /// The frame belongs to another feature multiplexed on the same primitive.
    #[error("frame name {0:?} does not belong to this protocol")]
    ForeignProtocol(String),

    /// The frame could not be parsed (unknown type, wrong field types, bad envelope text).
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// A positional event arrived without both coordinates.
    #[error("{0} frame is missing x/y coordinates")]
    MissingCoordinates(EventKind),

    /// A coordinate lies outside the unit interval.
    #[error("coordinate out of range: x={x}, y={y}")]
    CoordinateOutOfRange { x: f64, y: f64 },

    /// The frame could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// How frames are placed inside the host's endpoint message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// The frame object is the endpoint message payload.
    #[default]
    Plain,
    /// The frame is serialized to a string inside a text-message envelope.
    Text,
}

/// The on-wire shape of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFrame {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl From<&ControlEvent> for ControlFrame {
    fn from(event: &ControlEvent) -> Self {
        let position = event.position();
        Self {
            name: PROTOCOL_NAME.to_string(),
            kind: event.kind(),
            x: position.map(|p| p.x()),
            y: position.map(|p| p.y()),
        }
    }
}

impl TryFrom<ControlFrame> for ControlEvent {
    type Error = ProtocolError;

    fn try_from(frame: ControlFrame) -> Result<Self, Self::Error> {
        if frame.name != PROTOCOL_NAME {
            return Err(ProtocolError::ForeignProtocol(frame.name));
        }

        // Coordinates on non-positional kinds are ignored rather than rejected.
        let point = if frame.kind.carries_position() {
            match (frame.x, frame.y) {
                (Some(x), Some(y)) => Some(
                    NormalizedPoint::new(x, y)
                        .ok_or(ProtocolError::CoordinateOutOfRange { x, y })?,
                ),
                _ => return Err(ProtocolError::MissingCoordinates(frame.kind)),
            }
        } else {
            None
        };

        Ok(match (frame.kind, point) {
            (EventKind::Start, _) => ControlEvent::Start,
            (EventKind::Stop, _) => ControlEvent::Stop,
            (EventKind::PointerMove, Some(p)) => ControlEvent::PointerMove(p),
            (EventKind::PointerDown, Some(p)) => ControlEvent::PointerDown(p),
            (EventKind::PointerUp, Some(p)) => ControlEvent::PointerUp(p),
            (EventKind::PointerShow, _) => ControlEvent::PointerShow,
            (EventKind::PointerHide, _) => ControlEvent::PointerHide,
            (EventKind::Request, _) => ControlEvent::Request,
            (EventKind::Grant, _) => ControlEvent::Grant,
            (EventKind::Deny, _) => ControlEvent::Deny,
            (kind, None) => return Err(ProtocolError::MissingCoordinates(kind)),
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`ControlEvent`] into an endpoint-message payload.
///
/// # Errors
///
/// Returns [`ProtocolError::Serialization`] if the frame cannot be serialized.
///
/// # Examples
///
/// ```rust
/// use rc_core::{encode_frame, ControlEvent, Envelope};
///
/// let payload = encode_frame(&ControlEvent::Stop, Envelope::Plain).unwrap();
/// assert_eq!(payload["name"], "remote-control-protocol");
/// assert_eq!(payload["type"], "stop");
/// ```
pub fn encode_frame(event: &ControlEvent, envelope: Envelope) -> Result<Value, ProtocolError> {
    let frame = ControlFrame::from(event);
    match envelope {
        Envelope::Plain => {
            serde_json::to_value(&frame).map_err(|e| ProtocolError::Serialization(e.to_string()))
        }
        Envelope::Text => {
            let text = serde_json::to_string(&frame)
                .map_err(|e| ProtocolError::Serialization(e.to_string()))?;
            Ok(json!({ "name": TEXT_MESSAGE_NAME, "text": text }))
        }
    }
}

/// Decodes an endpoint-message payload into a [`ControlEvent`].
///
/// The `name` is checked before anything else is interpreted, so traffic
/// from other protocols fails fast with [`ProtocolError::ForeignProtocol`].
///
/// # Errors
///
/// - [`ProtocolError::MissingName`] / [`ProtocolError::ForeignProtocol`] for
///   frames that are not ours.
/// - [`ProtocolError::MalformedFrame`] for unknown `type` values or wrong
///   field types.
/// - [`ProtocolError::MissingCoordinates`] / [`ProtocolError::CoordinateOutOfRange`]
///   for bad pointer positions.
pub fn decode_frame(payload: &Value) -> Result<ControlEvent, ProtocolError> {
    let name = frame_name(payload)?;

    if name == TEXT_MESSAGE_NAME {
        let text = payload
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::MalformedFrame("text envelope without text".into()))?;
        let inner: Value = serde_json::from_str(text)
            .map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;
        // Envelopes do not nest.
        return decode_plain(&inner, frame_name(&inner)?);
    }

    decode_plain(payload, name)
}

fn decode_plain(payload: &Value, name: &str) -> Result<ControlEvent, ProtocolError> {
    if name != PROTOCOL_NAME {
        return Err(ProtocolError::ForeignProtocol(name.to_string()));
    }
    let frame: ControlFrame = serde_json::from_value(payload.clone())
        .map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;
    ControlEvent::try_from(frame)
}

fn frame_name(payload: &Value) -> Result<&str, ProtocolError> {
    payload
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingName)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
