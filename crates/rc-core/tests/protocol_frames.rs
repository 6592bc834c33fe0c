//! Integration tests for the rc-core public API.
//!
//! Exercises the path a pointer position takes from raw surface coordinates
//! to a decoded event on the remote side.

use rc_core::protocol::{PROTOCOL_NAME, TEXT_MESSAGE_NAME};
use rc_core::{
    decode_frame, encode_frame, ControlEvent, ControlFlavor, Envelope, EventKind, ProtocolError,
    SurfaceBounds,
};
use serde_json::json;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_surface_center_reaches_remote_as_half_half() {
    // Arrange
    let bounds = SurfaceBounds::new(100.0, 50.0, 400.0, 300.0);
    let point = bounds.normalize(300.0, 200.0).expect("usable surface");

    // Act
    let payload = encode_frame(&ControlEvent::PointerMove(point), Envelope::Plain).unwrap();
    let decoded = decode_frame(&payload).unwrap();

    // Assert
    assert_eq!(
        payload,
        json!({ "name": PROTOCOL_NAME, "type": "pointer-move", "x": 0.5, "y": 0.5 })
    );
    assert_eq!(decoded.position().map(|p| (p.x(), p.y())), Some((0.5, 0.5)));
}

#[test]
fn test_position_left_of_surface_is_sent_as_origin() {
    let bounds = SurfaceBounds::new(100.0, 50.0, 400.0, 300.0);
    let point = bounds.normalize(50.0, 50.0).unwrap();

    let payload = encode_frame(&ControlEvent::PointerDown(point), Envelope::Text).unwrap();

    assert_eq!(payload["name"], TEXT_MESSAGE_NAME);
    let decoded = decode_frame(&payload).unwrap();
    assert_eq!(decoded.kind(), EventKind::PointerDown);
    assert_eq!(decoded.position().map(|p| (p.x(), p.y())), Some((0.0, 0.0)));
}

#[test]
fn test_every_direct_flavor_event_survives_both_envelopes() {
    let point = SurfaceBounds::new(0.0, 0.0, 200.0, 100.0)
        .normalize(50.0, 75.0)
        .unwrap();
    let events = [
        ControlEvent::Start,
        ControlEvent::Stop,
        ControlEvent::PointerMove(point),
        ControlEvent::PointerDown(point),
        ControlEvent::PointerUp(point),
        ControlEvent::PointerShow,
        ControlEvent::PointerHide,
    ];

    for event in events {
        assert!(ControlFlavor::Direct.supports(event.kind()));
        for envelope in [Envelope::Plain, Envelope::Text] {
            let payload = encode_frame(&event, envelope).unwrap();
            assert_eq!(decode_frame(&payload).unwrap(), event, "{envelope:?} {event:?}");
        }
    }
}

#[test]
fn test_multiplexed_traffic_from_other_features_is_not_ours() {
    let unrelated = [
        json!({ "name": "polls", "type": "vote" }),
        json!({ "name": "endpoint-text-message", "text": "{\"name\":\"reactions\"}" }),
        json!({ "name": 17 }),
        json!([1, 2, 3]),
    ];

    for payload in unrelated {
        let err = decode_frame(&payload).unwrap_err();
        assert!(
            matches!(err, ProtocolError::ForeignProtocol(_) | ProtocolError::MissingName),
            "unexpected error {err:?} for {payload}"
        );
    }
}

#[test]
fn test_handshake_frames_decode() {
    for (kind, expected) in [
        ("request", ControlEvent::Request),
        ("grant", ControlEvent::Grant),
        ("deny", ControlEvent::Deny),
    ] {
        let payload = json!({ "name": PROTOCOL_NAME, "type": kind });
        assert_eq!(decode_frame(&payload).unwrap(), expected);
        assert!(ControlFlavor::Negotiated.supports(expected.kind()));
    }
}
