//! All remote-control protocol event types.
//!
//! Events form a closed set.  Inbound frames whose `type` is outside this set
//! are rejected by the codec instead of being passed around as loose JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::surface::NormalizedPoint;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Value of the `name` field in every frame of this protocol.
///
/// The host's endpoint-message primitive is shared with unrelated features;
/// the name is how a receiver tells our frames apart from theirs.
pub const PROTOCOL_NAME: &str = "remote-control-protocol";

/// Value of the `name` field of the host's generic text-message envelope.
pub const TEXT_MESSAGE_NAME: &str = "endpoint-text-message";

// ── Event kinds ───────────────────────────────────────────────────────────────

/// Discriminant carried in the frame's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Start,
    Stop,
    PointerMove,
    PointerDown,
    PointerUp,
    PointerShow,
    PointerHide,
    Request,
    Grant,
    Deny,
}

impl EventKind {
    /// Wire spelling of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::PointerMove => "pointer-move",
            Self::PointerDown => "pointer-down",
            Self::PointerUp => "pointer-up",
            Self::PointerShow => "pointer-show",
            Self::PointerHide => "pointer-hide",
            Self::Request => "request",
            Self::Grant => "grant",
            Self::Deny => "deny",
        }
    }

    /// Returns `true` for kinds whose frame carries `x` and `y`.
    pub fn carries_position(&self) -> bool {
        matches!(self, Self::PointerMove | Self::PointerDown | Self::PointerUp)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Flavors ───────────────────────────────────────────────────────────────────

/// The two kinds of controlled device.
///
/// - `Direct`: a companion mobile application.  Control starts immediately
///   and the device draws its own cursor from show/hide hints.
/// - `Negotiated`: a desktop peer that must grant the request first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlFlavor {
    #[default]
    Direct,
    Negotiated,
}

impl ControlFlavor {
    /// Returns `true` if `kind` belongs to this flavor's event set.
    pub fn supports(&self, kind: EventKind) -> bool {
        use EventKind::*;
        match self {
            Self::Direct => matches!(
                kind,
                Start | Stop | PointerMove | PointerDown | PointerUp | PointerShow | PointerHide
            ),
            Self::Negotiated => matches!(
                kind,
                Request | Grant | Deny | PointerMove | PointerDown | PointerUp | Stop
            ),
        }
    }

    /// Whether the controlled side renders its own cursor from show/hide hints.
    pub fn renders_remote_cursor(&self) -> bool {
        matches!(self, Self::Direct)
    }
}

// ── Control events ────────────────────────────────────────────────────────────

/// A single control-protocol event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Controller begins driving the device (direct flavor).
    Start,
    /// Control session ended by either side.
    Stop,
    PointerMove(NormalizedPoint),
    PointerDown(NormalizedPoint),
    PointerUp(NormalizedPoint),
    /// Pointer entered the surface; remote side should show its cursor.
    PointerShow,
    /// Pointer left the surface; remote side should hide its cursor.
    PointerHide,
    /// Controller asks a desktop peer for permission (negotiated flavor).
    Request,
    /// Desktop peer allows control.
    Grant,
    /// Desktop peer refuses control.
    Deny,
}

impl ControlEvent {
    /// Returns the wire discriminant for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start => EventKind::Start,
            Self::Stop => EventKind::Stop,
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::PointerUp(_) => EventKind::PointerUp,
            Self::PointerShow => EventKind::PointerShow,
            Self::PointerHide => EventKind::PointerHide,
            Self::Request => EventKind::Request,
            Self::Grant => EventKind::Grant,
            Self::Deny => EventKind::Deny,
        }
    }

    /// Returns the normalized position for pointer move/down/up events.
    pub fn position(&self) -> Option<NormalizedPoint> {
        match self {
            Self::PointerMove(p) | Self::PointerDown(p) | Self::PointerUp(p) => Some(*p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_wire_spelling_matches_serde() {
        for kind in [
            EventKind::Start,
            EventKind::Stop,
            EventKind::PointerMove,
            EventKind::PointerDown,
            EventKind::PointerUp,
            EventKind::PointerShow,
            EventKind::PointerHide,
            EventKind::Request,
            EventKind::Grant,
            EventKind::Deny,
        ] {
            let json = serde_json::to_value(kind).expect("serialize");
            assert_eq!(json, serde_json::Value::from(kind.as_str()));
        }
    }

    #[test]
    fn test_only_pointer_move_down_up_carry_position() {
        assert!(EventKind::PointerMove.carries_position());
        assert!(EventKind::PointerUp.carries_position());
        assert!(!EventKind::PointerShow.carries_position());
        assert!(!EventKind::Stop.carries_position());
    }

    #[test]
    fn test_direct_flavor_excludes_handshake_kinds() {
        let flavor = ControlFlavor::Direct;
        assert!(flavor.supports(EventKind::Start));
        assert!(flavor.supports(EventKind::PointerHide));
        assert!(!flavor.supports(EventKind::Request));
        assert!(!flavor.supports(EventKind::Grant));
    }

    #[test]
    fn test_negotiated_flavor_excludes_start() {
        let flavor = ControlFlavor::Negotiated;
        assert!(flavor.supports(EventKind::Request));
        assert!(flavor.supports(EventKind::Deny));
        assert!(flavor.supports(EventKind::Stop));
        assert!(!flavor.supports(EventKind::Start));
    }

    #[test]
    fn test_position_is_exposed_for_pointer_events_only() {
        let p = NormalizedPoint::clamped(0.25, 0.75);
        assert_eq!(ControlEvent::PointerDown(p).position(), Some(p));
        assert_eq!(ControlEvent::Grant.position(), None);
    }
}
