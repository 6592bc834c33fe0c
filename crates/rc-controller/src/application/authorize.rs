//! Use case: request/grant/deny handshake with an auto-accept countdown.
//!
//! The negotiator turns a start request into a binary decision.  The decision
//! comes from whichever happens first:
//!
//! 1. an explicit [`AuthorizationNegotiator::respond`] (user clicked a button
//!    or the peer answered with `grant`/`deny`), or
//! 2. the countdown reaching zero, which grants automatically.
//!
//! # Mutual exclusion (for beginners)
//!
//! Both paths *take* the pending request out of the negotiator and cancel its
//! timer in the same call.  Whichever path runs second finds nothing pending
//! and returns `None`.  A tick that was already queued when the timer was
//! cancelled carries the old request id and is ignored, so a late tick can
//! never flip a decision that was already made.
//!
//! The negotiator has no opinion about presentation: a dialog can poll
//! [`AuthorizationNegotiator::countdown`] after each tick and render it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rc_core::ParticipantId;
use tracing::{debug, info};
use uuid::Uuid;

use crate::infrastructure::timer::{RequestId, TickHandle, TickScheduler, MIN_TICK_PERIOD};

/// Default number of ticks before an unanswered request is granted.
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 5;

// ── Request & decision types ──────────────────────────────────────────────────

/// An outstanding authorization request.
///
/// Exists only inside the negotiator and is handed back inside the
/// [`Decision`] that ends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    id: RequestId,
    participant_id: ParticipantId,
    created_at: Instant,
    countdown_seconds: u32,
}

impl AuthorizationRequest {
    fn new(participant_id: ParticipantId, countdown_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_id,
            created_at: Instant::now(),
            countdown_seconds,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Ticks left before the automatic grant.
    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Control was allowed.  `automatic` is `true` when the countdown expired.
    Granted {
        participant_id: ParticipantId,
        automatic: bool,
    },
    /// Control was refused.
    Denied { participant_id: ParticipantId },
    /// The request was abandoned without a decision.
    Cancelled { participant_id: ParticipantId },
}

impl Decision {
    pub fn participant_id(&self) -> &ParticipantId {
        match self {
            Self::Granted { participant_id, .. }
            | Self::Denied { participant_id }
            | Self::Cancelled { participant_id } => participant_id,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

// ── Negotiator ────────────────────────────────────────────────────────────────

struct Pending {
    request: AuthorizationRequest,
    timer: Box<dyn TickHandle>,
}

impl Pending {
    /// Releases the timer and hands back the request.
    fn finish(self) -> AuthorizationRequest {
        self.timer.cancel();
        self.request
    }
}

/// Owns at most one [`AuthorizationRequest`] and its countdown timer.
pub struct AuthorizationNegotiator {
    scheduler: Arc<dyn TickScheduler>,
    countdown_seconds: u32,
    tick_interval: Duration,
    pending: Option<Pending>,
}

impl AuthorizationNegotiator {
    /// Creates a negotiator.  A `countdown_seconds` of zero is raised to one
    /// so every request sees at least one tick, and a `tick_interval` below
    /// [`MIN_TICK_PERIOD`] is raised to it.
    pub fn new(
        scheduler: Arc<dyn TickScheduler>,
        countdown_seconds: u32,
        tick_interval: Duration,
    ) -> Self {
        Self {
            scheduler,
            countdown_seconds: countdown_seconds.max(1),
            tick_interval: tick_interval.max(MIN_TICK_PERIOD),
            pending: None,
        }
    }

    /// Opens a request for `participant_id` and starts its countdown.
    ///
    /// A request that is still pending is cancelled first.
    pub fn begin(&mut self, participant_id: ParticipantId) -> &AuthorizationRequest {
        if let Some(previous) = self.pending.take() {
            let previous = previous.finish();
            debug!(participant = %previous.participant_id, "superseded pending authorization");
        }

        let request = AuthorizationRequest::new(participant_id, self.countdown_seconds);
        let timer = self.scheduler.schedule(request.id, self.tick_interval);
        info!(
            participant = %request.participant_id,
            request_id = %request.id,
            countdown = request.countdown_seconds,
            "authorization requested"
        );
        &self
            .pending
            .insert(Pending { request, timer })
            .request
    }

    pub fn request(&self) -> Option<&AuthorizationRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    /// Ticks left on the pending request.
    pub fn countdown(&self) -> Option<u32> {
        self.request().map(|r| r.countdown_seconds)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handles one countdown tick.
    ///
    /// Returns an automatic grant when the countdown reaches zero.  Ticks for
    /// a request that is no longer pending are ignored.
    pub fn tick(&mut self, request_id: RequestId) -> Option<Decision> {
        let pending = self.pending.as_mut()?;
        if pending.request.id != request_id {
            debug!(%request_id, "ignoring stale authorization tick");
            return None;
        }

        pending.request.countdown_seconds = pending.request.countdown_seconds.saturating_sub(1);
        if pending.request.countdown_seconds > 0 {
            return None;
        }

        let request = self.pending.take()?.finish();
        info!(participant = %request.participant_id, "authorization countdown expired, granting");
        Some(Decision::Granted {
            participant_id: request.participant_id,
            automatic: true,
        })
    }

    /// Records an explicit decision for the pending request.
    pub fn respond(&mut self, granted: bool) -> Option<Decision> {
        let request = self.pending.take()?.finish();
        info!(participant = %request.participant_id, granted, "authorization answered");
        let participant_id = request.participant_id;
        Some(if granted {
            Decision::Granted {
                participant_id,
                automatic: false,
            }
        } else {
            Decision::Denied { participant_id }
        })
    }

    /// Like [`respond`](Self::respond), but only if `from` is the participant
    /// the request is addressed to.
    pub fn respond_from(&mut self, from: &ParticipantId, granted: bool) -> Option<Decision> {
        let pending = self.request().map(|r| r.participant_id.clone());
        match pending {
            Some(pending) if pending == *from => self.respond(granted),
            Some(pending) => {
                debug!(
                    from = %from,
                    pending = %pending,
                    "ignoring authorization answer from unrelated participant"
                );
                None
            }
            None => None,
        }
    }

    /// Abandons the pending request without a decision.
    pub fn cancel(&mut self) -> Option<Decision> {
        let request = self.pending.take()?.finish();
        debug!(participant = %request.participant_id, "authorization cancelled");
        Some(Decision::Cancelled {
            participant_id: request.participant_id,
        })
    }
}

impl Drop for AuthorizationNegotiator {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.finish();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
