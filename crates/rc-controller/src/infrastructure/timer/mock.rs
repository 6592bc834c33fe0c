//! Manual tick scheduler for unit testing.
//!
//! Records every schedule and cancel call without spawning anything; tests
//! deliver ticks themselves by calling the negotiator or controller directly.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use super::{RequestId, TickHandle, TickScheduler};

/// A [`TickScheduler`] that only counts.
#[derive(Default)]
pub struct ManualTickScheduler {
    scheduled: Mutex<Vec<(RequestId, Duration)>>,
    cancelled: Arc<AtomicUsize>,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many timers have been started.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.lock().expect("lock poisoned").len()
    }

    /// Returns the request id of the most recently started timer.
    pub fn last_request_id(&self) -> Option<RequestId> {
        self.scheduled
            .lock()
            .expect("lock poisoned")
            .last()
            .map(|(id, _)| *id)
    }

    /// Returns the period of the most recently started timer.
    pub fn last_period(&self) -> Option<Duration> {
        self.scheduled
            .lock()
            .expect("lock poisoned")
            .last()
            .map(|(_, period)| *period)
    }

    /// Returns how many timers have been cancelled.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the number of timers started but not yet cancelled.
    pub fn running_count(&self) -> usize {
        self.scheduled_count() - self.cancelled_count()
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&self, request_id: RequestId, period: Duration) -> Box<dyn TickHandle> {
        self.scheduled
            .lock()
            .expect("lock poisoned")
            .push((request_id, period));
        Box::new(ManualTickHandle {
            cancelled: Arc::clone(&self.cancelled),
        })
    }
}

struct ManualTickHandle {
    cancelled: Arc<AtomicUsize>,
}

impl TickHandle for ManualTickHandle {
    fn cancel(self: Box<Self>) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}
