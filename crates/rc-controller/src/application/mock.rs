//! Recording session observer for unit and integration testing.

use std::sync::Mutex;

use rc_core::{Session, SessionState};

use super::control_session::{Notice, SessionObserver};

/// A [`SessionObserver`] that keeps every snapshot and notice it receives.
#[derive(Default)]
pub struct RecordingObserver {
    snapshots: Mutex<Vec<Session>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every published session snapshot in order.
    pub fn snapshots(&self) -> Vec<Session> {
        self.snapshots.lock().expect("lock poisoned").clone()
    }

    /// Returns how many published snapshots were in `state`.
    pub fn transitions_to(&self, state: SessionState) -> usize {
        self.snapshots
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|s| s.state() == state)
            .count()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("lock poisoned").clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn session_changed(&self, session: &Session) {
        self.snapshots
            .lock()
            .expect("lock poisoned")
            .push(session.clone());
    }

    fn notice(&self, notice: Notice) {
        self.notices.lock().expect("lock poisoned").push(notice);
    }
}
