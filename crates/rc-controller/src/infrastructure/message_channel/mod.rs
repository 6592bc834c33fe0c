//! Protocol framing over the host's endpoint-message primitive.
//!
//! Outbound, a [`ControlEvent`] is encoded into a frame and handed to
//! [`HostSession::send_endpoint_message`].  Every failure on the way (no live
//! session, encoding, transport) is logged and reported as `false`; nothing is
//! retried because a stale pointer position is worse than a missing one.
//!
//! Inbound, payloads are checked for this protocol's `name` before anything
//! else.  The primitive is shared with unrelated features, so foreign frames
//! are expected and dropped quietly.

use std::sync::Arc;

use rc_core::{decode_frame, encode_frame, ControlEvent, Envelope, ParticipantId, ProtocolError};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::application::host::HostSession;

pub mod mock;

/// Sends and receives control frames for one local endpoint.
#[derive(Clone)]
pub struct MessageChannel {
    host: Arc<dyn HostSession>,
    envelope: Envelope,
}

impl MessageChannel {
    pub fn new(host: Arc<dyn HostSession>, envelope: Envelope) -> Self {
        Self { host, envelope }
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    /// Sends `event` to `target`.  Returns `true` if the host accepted it.
    pub fn send(&self, target: &ParticipantId, event: &ControlEvent) -> bool {
        if !self.host.has_active_session() {
            debug!(%target, kind = %event.kind(), "no live session, not sending");
            return false;
        }

        let payload = match encode_frame(event, self.envelope) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(%target, kind = %event.kind(), error = %e, "failed to encode control frame");
                return false;
            }
        };

        match self.host.send_endpoint_message(target, payload) {
            Ok(()) => {
                trace!(%target, kind = %event.kind(), "control frame sent");
                true
            }
            Err(e) => {
                warn!(%target, kind = %event.kind(), error = %e, "failed to send control frame");
                false
            }
        }
    }

    /// Decodes an inbound payload from `from`.
    ///
    /// Returns `None` for foreign or malformed frames.
    pub fn receive(&self, from: &ParticipantId, payload: &Value) -> Option<ControlEvent> {
        match decode_frame(payload) {
            Ok(event) => {
                trace!(%from, kind = %event.kind(), "control frame received");
                Some(event)
            }
            Err(ProtocolError::MissingName | ProtocolError::ForeignProtocol(_)) => {
                trace!(%from, "ignoring frame for another protocol");
                None
            }
            Err(e) => {
                debug!(%from, error = %e, "dropping malformed control frame");
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
