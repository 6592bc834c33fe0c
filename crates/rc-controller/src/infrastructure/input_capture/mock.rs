//! Mock pointer source for unit testing.
//!
//! Allows tests to inject synthetic [`RawInputEvent`]s without a real
//! rendering surface or platform listeners.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use super::{CaptureError, InputSink, PointerSource, RawInputEvent};

/// A mock implementation of [`PointerSource`] that allows tests to inject events.
#[derive(Default)]
pub struct MockPointerSource {
    sink: Mutex<Option<InputSink>>,
    attach_count: AtomicUsize,
    detach_count: AtomicUsize,
    fail_attach: AtomicBool,
}

impl MockPointerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a synthetic event, as if reported by the surface.
    ///
    /// Returns `false` if no listeners are attached.
    pub fn inject_event(&self, event: RawInputEvent) -> bool {
        let guard = self.sink.lock().expect("lock poisoned");
        match guard.as_ref() {
            Some(sink) => sink.send(event),
            None => false,
        }
    }

    /// Makes the next `attach` calls fail.
    pub fn set_fail_attach(&self, fail: bool) {
        self.fail_attach.store(fail, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.sink.lock().expect("lock poisoned").is_some()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count.load(Ordering::SeqCst)
    }
}

impl PointerSource for MockPointerSource {
    fn attach(&self, sink: InputSink) -> Result<(), CaptureError> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(CaptureError::ListenerInstallFailed(
                "mock configured to fail".to_string(),
            ));
        }
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        *self.sink.lock().expect("lock poisoned") = Some(sink);
        Ok(())
    }

    fn detach(&self) {
        self.detach_count.fetch_add(1, Ordering::SeqCst);
        // Dropping the sender stops forwarding.
        *self.sink.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_mock_pointer_source_forwards_events_while_attached() {
        // Arrange
        let source = MockPointerSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        source.attach(InputSink::new(3, tx)).unwrap();

        // Act
        let sent = source.inject_event(RawInputEvent::MouseEnter);

        // Assert
        assert!(sent);
        let captured = rx.try_recv().unwrap();
        assert_eq!(captured.generation, 3);
        assert_eq!(captured.event, RawInputEvent::MouseEnter);
    }

    #[test]
    fn test_mock_pointer_source_drops_events_after_detach() {
        let source = MockPointerSource::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        source.attach(InputSink::new(1, tx)).unwrap();

        source.detach();

        assert!(!source.inject_event(RawInputEvent::MouseLeave));
        assert!(!source.is_attached());
    }
}
