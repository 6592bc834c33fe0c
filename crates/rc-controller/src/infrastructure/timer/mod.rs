//! Cancellable countdown ticks for the authorization handshake.
//!
//! A tick is a scheduled callback, not a blocking wait: the tokio
//! implementation spawns an interval task that pushes the request id into the
//! event loop's tick channel once per period.  The loop then calls back into
//! the negotiator on its own task, so tick handling never races a user's
//! explicit decision.
//!
//! # Scoped resource
//!
//! Every [`TickScheduler::schedule`] call returns a [`TickHandle`] that must be
//! cancelled exactly once.  Dropping a tokio handle also aborts the task, so a
//! handle lost on an unexpected exit path cannot keep ticking.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;
use uuid::Uuid;

pub mod mock;

/// Identifies the authorization request a tick belongs to.
pub type RequestId = Uuid;

/// Shortest tick period.  Shorter periods, zero included, are raised to it.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Owner of a running periodic tick.
pub trait TickHandle: Send {
    /// Stops the ticks.  After this returns no new tick is produced.
    fn cancel(self: Box<Self>);
}

/// Starts periodic ticks for an authorization request.
pub trait TickScheduler: Send + Sync {
    /// Begins ticking every `period`, first tick one `period` from now.
    fn schedule(&self, request_id: RequestId, period: Duration) -> Box<dyn TickHandle>;
}

// ── Tokio implementation ──────────────────────────────────────────────────────

/// Production scheduler backed by `tokio::time::interval`.
///
/// Must be used from within a tokio runtime.
pub struct TokioTickScheduler {
    ticks: mpsc::UnboundedSender<RequestId>,
}

impl TokioTickScheduler {
    /// Creates a scheduler that delivers ticks into `ticks`.
    pub fn new(ticks: mpsc::UnboundedSender<RequestId>) -> Self {
        Self { ticks }
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(&self, request_id: RequestId, period: Duration) -> Box<dyn TickHandle> {
        // `interval_at` panics on a zero period.
        let period = period.max(MIN_TICK_PERIOD);
        let ticks = self.ticks.clone();
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(%request_id, "authorization countdown tick");
                if ticks.send(request_id).is_err() {
                    // Event loop is gone.
                    break;
                }
            }
        });
        Box::new(TokioTickHandle { task })
    }
}

struct TokioTickHandle {
    task: JoinHandle<()>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(self: Box<Self>) {
        self.task.abort();
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
