//! Recording host session for unit and integration testing.
//!
//! Stands in for the conferencing layer: it records every endpoint message
//! instead of sending it, and lets tests toggle session liveness, transport
//! failure, surface bounds, and screen sharing.

use std::collections::HashSet;
use std::sync::Mutex;

use rc_core::{decode_frame, ControlEvent, ParticipantId, SurfaceBounds};
use serde_json::Value;

use crate::application::host::{HostError, HostSession};

struct HostState {
    session_live: bool,
    fail_sends: bool,
    bounds: Option<SurfaceBounds>,
    sharing: HashSet<ParticipantId>,
    sent: Vec<(ParticipantId, Value)>,
}

/// A [`HostSession`] that records outbound messages.
///
/// Starts with a live session and a 400x300 surface at (100, 50).
pub struct RecordingHost {
    state: Mutex<HostState>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                session_live: true,
                fail_sends: false,
                bounds: Some(SurfaceBounds::new(100.0, 50.0, 400.0, 300.0)),
                sharing: HashSet::new(),
                sent: Vec::new(),
            }),
        }
    }

    /// Creates a host with no joined conference.
    pub fn without_session() -> Self {
        let host = Self::new();
        host.set_session_live(false);
        host
    }

    pub fn set_session_live(&self, live: bool) {
        self.state.lock().expect("lock poisoned").session_live = live;
    }

    /// Makes every send fail with a transport error.
    pub fn set_fail_sends(&self, fail: bool) {
        self.state.lock().expect("lock poisoned").fail_sends = fail;
    }

    pub fn set_bounds(&self, bounds: Option<SurfaceBounds>) {
        self.state.lock().expect("lock poisoned").bounds = bounds;
    }

    pub fn set_sharing(&self, participant: ParticipantId, sharing: bool) {
        let mut state = self.state.lock().expect("lock poisoned");
        if sharing {
            state.sharing.insert(participant);
        } else {
            state.sharing.remove(&participant);
        }
    }

    /// Returns every recorded `(recipient, payload)` pair.
    pub fn sent(&self) -> Vec<(ParticipantId, Value)> {
        self.state.lock().expect("lock poisoned").sent.clone()
    }

    /// Returns the recorded messages decoded back into events.
    ///
    /// Panics on a payload that is not a valid control frame.
    pub fn sent_events(&self) -> Vec<(ParticipantId, ControlEvent)> {
        self.sent()
            .into_iter()
            .map(|(to, payload)| {
                let event = decode_frame(&payload).expect("recorded payload must be a control frame");
                (to, event)
            })
            .collect()
    }

    /// Returns how many recorded events have the given kind.
    pub fn count_of(&self, event: ControlEvent) -> usize {
        self.sent_events()
            .iter()
            .filter(|(_, e)| e.kind() == event.kind())
            .count()
    }

    pub fn clear(&self) {
        self.state.lock().expect("lock poisoned").sent.clear();
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSession for RecordingHost {
    fn has_active_session(&self) -> bool {
        self.state.lock().expect("lock poisoned").session_live
    }

    fn send_endpoint_message(&self, to: &ParticipantId, payload: Value) -> Result<(), HostError> {
        let mut state = self.state.lock().expect("lock poisoned");
        if !state.session_live {
            return Err(HostError::NoSession);
        }
        if state.fail_sends {
            return Err(HostError::Transport("mock configured to fail".to_string()));
        }
        state.sent.push((to.clone(), payload));
        Ok(())
    }

    fn rendering_surface_bounds(&self) -> Option<SurfaceBounds> {
        self.state.lock().expect("lock poisoned").bounds
    }

    fn is_sharing_screen(&self, participant: &ParticipantId) -> bool {
        self.state
            .lock()
            .expect("lock poisoned")
            .sharing
            .contains(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::{encode_frame, Envelope};

    #[test]
    fn test_recording_host_records_and_clears() {
        // Arrange
        let host = RecordingHost::new();
        let payload = encode_frame(&ControlEvent::Stop, Envelope::Plain).unwrap();

        // Act
        host.send_endpoint_message(&ParticipantId::from("p1"), payload)
            .unwrap();

        // Assert
        assert_eq!(host.count_of(ControlEvent::Stop), 1);
        host.clear();
        assert!(host.sent().is_empty());
    }

    #[test]
    fn test_recording_host_without_session_rejects_sends() {
        let host = RecordingHost::without_session();
        let result = host.send_endpoint_message(&ParticipantId::from("p1"), Value::Null);
        assert_eq!(result, Err(HostError::NoSession));
    }
}
