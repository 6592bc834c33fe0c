//! Use case: answer control requests on the desktop peer.
//!
//! This is the controlled side of the negotiated flavor.  A `request` frame
//! opens a prompt with the same auto-accept countdown the controller uses;
//! the prompt ends with a `grant` or `deny` frame back to the requester.
//!
//! Rules:
//!
//! - Only one requester at a time.  A second requester, while a prompt is
//!   open or while someone already holds control, is denied immediately.
//! - A repeated request from the current controller is granted again.
//! - Pointer frames are accepted only from the granted controller.
//! - A `stop` frame or the controller leaving clears the grant.
//!
//! # Wiring ticks
//!
//! `GrantAccess` is synchronous, like the session controller.  Whoever owns it
//! also owns the receiving end of a tick channel: hand the sender to a
//! [`TokioTickScheduler`](crate::infrastructure::timer::TokioTickScheduler)
//! and feed every received id back into [`GrantAccess::on_tick`], next to the
//! host's inbound messages.
//!
//! ```ignore
//! let (tick_tx, mut ticks) = mpsc::unbounded_channel();
//! let negotiator = AuthorizationNegotiator::new(
//!     Arc::new(TokioTickScheduler::new(tick_tx)),
//!     config.countdown_seconds,
//!     config.tick_interval(),
//! );
//! let mut access = GrantAccess::new(MessageChannel::new(host, config.envelope), negotiator);
//! loop {
//!     tokio::select! {
//!         Some((from, payload)) = inbound.recv() => {
//!             if let Some(event) = access.on_inbound_message(&from, &payload) {
//!                 replay(event);
//!             }
//!         }
//!         Some(request_id) = ticks.recv() => access.on_tick(request_id),
//!     }
//! }
//! ```

use rc_core::{ControlEvent, ParticipantId};
use serde_json::Value;
use tracing::{debug, info};

use crate::application::authorize::{AuthorizationNegotiator, AuthorizationRequest, Decision};
use crate::infrastructure::message_channel::MessageChannel;
use crate::infrastructure::timer::RequestId;

/// Controlled-side authorization state.
pub struct GrantAccess {
    channel: MessageChannel,
    negotiator: AuthorizationNegotiator,
    controlled_by: Option<ParticipantId>,
}

impl GrantAccess {
    pub fn new(channel: MessageChannel, negotiator: AuthorizationNegotiator) -> Self {
        Self {
            channel,
            negotiator,
            controlled_by: None,
        }
    }

    /// The open prompt, if any.  A dialog renders its countdown.
    pub fn prompt(&self) -> Option<&AuthorizationRequest> {
        self.negotiator.request()
    }

    /// The participant currently allowed to drive this device.
    pub fn controlled_by(&self) -> Option<&ParticipantId> {
        self.controlled_by.as_ref()
    }

    /// Handles an inbound payload.
    ///
    /// Returns the pointer event to replay locally when the frame is pointer
    /// input from the granted controller.
    pub fn on_inbound_message(
        &mut self,
        from: &ParticipantId,
        payload: &Value,
    ) -> Option<ControlEvent> {
        let event = self.channel.receive(from, payload)?;
        match event {
            ControlEvent::Request => {
                self.on_request(from);
                None
            }
            ControlEvent::Stop => {
                self.release(from);
                None
            }
            ControlEvent::PointerMove(_) | ControlEvent::PointerDown(_) | ControlEvent::PointerUp(_)
                if self.controlled_by.as_ref() == Some(from) =>
            {
                Some(event)
            }
            other => {
                debug!(%from, kind = %other.kind(), "dropping inbound event");
                None
            }
        }
    }

    fn on_request(&mut self, from: &ParticipantId) {
        if self.controlled_by.as_ref() == Some(from) {
            self.channel.send(from, &ControlEvent::Grant);
            return;
        }
        let prompt_for = self.prompt().map(|r| r.participant_id().clone());
        match (&self.controlled_by, prompt_for) {
            (None, None) => {
                self.negotiator.begin(from.clone());
            }
            (None, Some(pending)) if pending == *from => {
                debug!(%from, "duplicate request while prompt is open");
            }
            _ => {
                info!(%from, "busy, denying control request");
                self.channel.send(from, &ControlEvent::Deny);
            }
        }
    }

    /// Handles one countdown tick of the open prompt.
    pub fn on_tick(&mut self, request_id: RequestId) {
        if let Some(decision) = self.negotiator.tick(request_id) {
            self.apply(decision);
        }
    }

    /// Applies the local user's answer to the open prompt.
    pub fn respond(&mut self, granted: bool) {
        if let Some(decision) = self.negotiator.respond(granted) {
            self.apply(decision);
        }
    }

    /// Drops any grant or prompt held by a participant that left.
    pub fn on_participant_left(&mut self, participant: &ParticipantId) {
        self.release(participant);
    }

    /// Takes control back from the current controller.
    pub fn revoke(&mut self) {
        if let Some(controller) = self.controlled_by.take() {
            info!(%controller, "revoking remote control");
            self.channel.send(&controller, &ControlEvent::Stop);
        }
    }

    fn release(&mut self, participant: &ParticipantId) {
        if self.controlled_by.as_ref() == Some(participant) {
            info!(%participant, "remote control released");
            self.controlled_by = None;
        }
        if self.prompt().is_some_and(|r| r.participant_id() == participant) {
            self.negotiator.cancel();
        }
    }

    fn apply(&mut self, decision: Decision) {
        match decision {
            Decision::Granted { participant_id, .. } => {
                self.channel.send(&participant_id, &ControlEvent::Grant);
                info!(participant = %participant_id, "remote control granted");
                self.controlled_by = Some(participant_id);
            }
            Decision::Denied { participant_id } => {
                self.channel.send(&participant_id, &ControlEvent::Deny);
            }
            Decision::Cancelled { .. } => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
