//! Control session lifecycle entity.
//!
//! A [`Session`] is the one piece of state every other component reads: it
//! says whether this endpoint is currently driving someone's pointer and, if
//! so, whose.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//! negotiated flavor:  Idle ──► PendingAuthorization ──► Active ──► Idle
//! direct flavor:      Idle ─────────────────────────► Active ──► Idle
//! ```
//!
//! The machine is cyclic: returning to `Idle` is the only way out of any
//! state, and a new participant can only be controlled after that return.
//! The transition methods enforce this, so holding two controlled ids at
//! once cannot be expressed.

use std::fmt;

use thiserror::Error;

use super::participant::ParticipantId;

/// The three lifecycle states of a control session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Nobody is being controlled.
    #[default]
    Idle,
    /// A request was sent and the grant/deny decision is outstanding.
    PendingAuthorization,
    /// Pointer input is being forwarded to the controlled participant.
    Active,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PendingAuthorization => write!(f, "pending-authorization"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// Errors raised by illegal session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A new session was requested while another one is still open.
    #[error("session is {state} with {controlled}; stop it before starting another")]
    NotIdle {
        state: SessionState,
        controlled: ParticipantId,
    },

    /// A grant arrived for someone other than the pending participant.
    #[error("authorization for {granted} does not match pending participant {pending}")]
    ParticipantMismatch {
        pending: ParticipantId,
        granted: ParticipantId,
    },
}

/// The control session owned by one local endpoint.
///
/// `controlled_id` is present exactly when `state` is not [`SessionState::Idle`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    state: SessionState,
    controlled_id: Option<ParticipantId>,
}

impl Session {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the participant being controlled (or awaiting authorization).
    pub fn controlled_id(&self) -> Option<&ParticipantId> {
        self.controlled_id.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Returns `true` if `participant` is the one recorded by a non-idle session.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        self.controlled_id.as_ref() == Some(participant)
    }

    /// Moves `Idle → PendingAuthorization` for `participant`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotIdle`] if a session is already open.
    pub fn begin_authorization(&mut self, participant: ParticipantId) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.state = SessionState::PendingAuthorization;
        self.controlled_id = Some(participant);
        Ok(())
    }

    /// Moves to `Active` for `participant`.
    ///
    /// Legal from `Idle` (direct flavor) and from `PendingAuthorization` when
    /// the grant names the pending participant.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotIdle`] if already active, or
    /// [`SessionError::ParticipantMismatch`] if the grant is for someone else.
    pub fn activate(&mut self, participant: ParticipantId) -> Result<(), SessionError> {
        match (self.state, self.controlled_id.as_ref()) {
            (SessionState::Idle, _) => {}
            (SessionState::PendingAuthorization, Some(pending)) if *pending == participant => {}
            (SessionState::PendingAuthorization, Some(pending)) => {
                return Err(SessionError::ParticipantMismatch {
                    pending: pending.clone(),
                    granted: participant,
                });
            }
            _ => self.ensure_idle()?,
        }
        self.state = SessionState::Active;
        self.controlled_id = Some(participant);
        Ok(())
    }

    /// Returns to `Idle`, yielding the participant that was recorded, if any.
    pub fn reset(&mut self) -> Option<ParticipantId> {
        self.state = SessionState::Idle;
        self.controlled_id.take()
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match &self.controlled_id {
            Some(controlled) if !self.is_idle() => Err(SessionError::NotIdle {
                state: self.state,
                controlled: controlled.clone(),
            }),
            _ => Ok(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
