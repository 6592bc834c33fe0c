//! SessionController: the controller-side remote-control state machine.
//!
//! Every input that can change who is being controlled funnels through this
//! type: user start/stop requests, participant departures, raw pointer input,
//! countdown ticks, and inbound protocol frames.  It is the only writer of the
//! [`Session`]; everyone else receives snapshots through a
//! [`SessionObserver`].
//!
//! # Architecture
//!
//! The controller depends on the [`HostSession`] trait and on infrastructure
//! adapters that are themselves built over traits ([`MessageChannel`],
//! [`InputCapture`], [`AuthorizationNegotiator`]).  All of them are injected at
//! construction time, so the whole machine runs synchronously in unit tests.
//!
//! # Resource scoping
//!
//! Entering `Active` attaches the pointer listeners; every path back to `Idle`
//! detaches them.  Leaving `PendingAuthorization` for any reason releases the
//! countdown timer.  Both releases are idempotent, so the paths may overlap.

use std::sync::Arc;

use rc_core::{ControlEvent, ControlFlavor, ParticipantId, Session, SessionState};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::application::authorize::{AuthorizationNegotiator, Decision};
use crate::application::host::HostSession;
use crate::infrastructure::input_capture::{CapturedInput, InputCapture, PointerEvent};
use crate::infrastructure::message_channel::MessageChannel;
use crate::infrastructure::timer::RequestId;

// ── Observer ──────────────────────────────────────────────────────────────────

/// User-visible events worth a short confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Control of the participant began.
    Started(ParticipantId),
    /// Control of the participant ended.
    Stopped(ParticipantId),
    /// A request was sent and is waiting for an answer.
    AuthorizationPending(ParticipantId),
    /// The participant refused control.
    AuthorizationDenied(ParticipantId),
}

/// Receives session snapshots and notices from the controller.
///
/// Implemented by whatever renders session state (a cursor overlay, a menu
/// button, a toast).
pub trait SessionObserver: Send + Sync {
    /// Called after every state transition with the new snapshot.
    fn session_changed(&self, session: &Session);

    /// Called for events that deserve a user-visible confirmation.
    fn notice(&self, notice: Notice);
}

/// Whether a participant can be controlled right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAvailability {
    /// No host session, or the participant shares no screen to drive.
    NotAvailable,
    /// Control can be started.
    Available,
    /// The participant is already being controlled (or asked).
    Active,
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Owns the [`Session`] and orchestrates every transition.
pub struct SessionController {
    flavor: ControlFlavor,
    session: Session,
    host: Arc<dyn HostSession>,
    channel: MessageChannel,
    capture: InputCapture,
    negotiator: AuthorizationNegotiator,
    observer: Arc<dyn SessionObserver>,
}

impl SessionController {
    pub fn new(
        flavor: ControlFlavor,
        host: Arc<dyn HostSession>,
        channel: MessageChannel,
        capture: InputCapture,
        negotiator: AuthorizationNegotiator,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            flavor,
            session: Session::new(),
            host,
            channel,
            capture,
            negotiator,
            observer,
        }
    }

    pub fn flavor(&self) -> ControlFlavor {
        self.flavor
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn negotiator(&self) -> &AuthorizationNegotiator {
        &self.negotiator
    }

    pub fn capture(&self) -> &InputCapture {
        &self.capture
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Begins controlling `participant`.
    ///
    /// Does nothing without a live host session, or if `participant` is
    /// already the one recorded.  A session with someone else is stopped
    /// first, so two controlled ids never coexist.
    pub fn start(&mut self, participant: ParticipantId) {
        if !self.host.has_active_session() {
            debug!(%participant, "no live session, ignoring start");
            return;
        }
        if self.session.involves(&participant) {
            debug!(%participant, state = %self.session.state(), "already controlling participant");
            return;
        }
        if !self.session.is_idle() {
            self.stop();
        }

        match self.flavor {
            ControlFlavor::Direct => {
                if let Err(e) = self.session.activate(participant.clone()) {
                    warn!(error = %e, "could not activate session");
                    return;
                }
                self.attach_capture();
                self.channel.send(&participant, &ControlEvent::Start);
                info!(%participant, "remote control started");
                self.publish();
                self.observer.notice(Notice::Started(participant));
            }
            ControlFlavor::Negotiated => {
                if let Err(e) = self.session.begin_authorization(participant.clone()) {
                    warn!(error = %e, "could not begin authorization");
                    return;
                }
                self.negotiator.begin(participant.clone());
                self.channel.send(&participant, &ControlEvent::Request);
                self.publish();
                self.observer
                    .notice(Notice::AuthorizationPending(participant));
            }
        }
    }

    /// Ends the current session, telling the controlled participant.
    ///
    /// Calling it while idle does nothing.
    pub fn stop(&mut self) {
        self.end_session(true);
    }

    /// Stops the session if `participant` is the one recorded.
    pub fn on_participant_left(&mut self, participant: &ParticipantId) {
        if self.session.involves(participant) {
            info!(%participant, "controlled participant left");
            self.stop();
        }
    }

    fn end_session(&mut self, notify_peer: bool) {
        self.negotiator.cancel();
        self.capture.detach();
        let Some(participant) = self.session.reset() else {
            return;
        };
        if notify_peer {
            self.channel.send(&participant, &ControlEvent::Stop);
        }
        info!(%participant, "remote control stopped");
        self.publish();
        self.observer.notice(Notice::Stopped(participant));
    }

    // ── Pointer input ─────────────────────────────────────────────────────────

    /// Forwards a normalized pointer event to the controlled participant.
    ///
    /// Only active sessions forward; a pending session never leaks input.
    pub fn on_pointer_event(&mut self, event: PointerEvent) {
        if !self.session.is_active() {
            return;
        }
        let Some(target) = self.session.controlled_id() else {
            return;
        };
        if matches!(event, PointerEvent::Enter | PointerEvent::Leave)
            && !self.flavor.renders_remote_cursor()
        {
            return;
        }
        let control_event = event.to_control_event();
        trace!(%target, kind = %control_event.kind(), "forwarding pointer event");
        self.channel.send(target, &control_event);
    }

    /// Normalizes a raw surface event against the current surface bounds and
    /// forwards it.
    ///
    /// Input captured by an earlier attach is dropped, so events still queued
    /// when a session ends never reach the next controlled participant.
    pub fn on_raw_input(&mut self, input: CapturedInput) {
        if !self.session.is_active() {
            return;
        }
        let bounds = self.host.rendering_surface_bounds();
        if let Some(event) = self.capture.translate(&input, bounds) {
            self.on_pointer_event(event);
        }
    }

    // ── Authorization ─────────────────────────────────────────────────────────

    /// Handles one countdown tick of the pending request.
    pub fn on_authorization_tick(&mut self, request_id: RequestId) {
        if let Some(decision) = self.negotiator.tick(request_id) {
            self.apply_decision(decision);
        }
    }

    /// Applies a local grant/deny for the pending request.
    ///
    /// A local deny withdraws the request from the peer with a `stop` frame.
    pub fn respond_to_authorization(&mut self, granted: bool) {
        let Some(decision) = self.negotiator.respond(granted) else {
            debug!("no pending authorization to answer");
            return;
        };
        if let Decision::Denied { participant_id } = &decision {
            self.channel.send(participant_id, &ControlEvent::Stop);
        }
        self.apply_decision(decision);
    }

    /// Handles an endpoint message addressed to this endpoint.
    ///
    /// Only the negotiated flavor listens: `grant`/`deny` answer the pending
    /// request, and `stop` from the controlled participant ends the session.
    pub fn on_inbound_message(&mut self, from: &ParticipantId, payload: &Value) {
        if self.flavor != ControlFlavor::Negotiated {
            return;
        }
        let Some(event) = self.channel.receive(from, payload) else {
            return;
        };
        if !self.flavor.supports(event.kind()) {
            debug!(%from, kind = %event.kind(), "ignoring event outside negotiated flavor");
            return;
        }

        match event {
            ControlEvent::Grant | ControlEvent::Deny
                if self.session.state() == SessionState::PendingAuthorization =>
            {
                let granted = event == ControlEvent::Grant;
                if let Some(decision) = self.negotiator.respond_from(from, granted) {
                    self.apply_decision(decision);
                }
            }
            ControlEvent::Stop if self.session.involves(from) => {
                info!(%from, "controlled participant ended the session");
                self.end_session(false);
            }
            other => {
                debug!(%from, kind = %other.kind(), state = %self.session.state(), "ignoring inbound event");
            }
        }
    }

    fn apply_decision(&mut self, decision: Decision) {
        match decision {
            Decision::Granted { participant_id, .. } => {
                if let Err(e) = self.session.activate(participant_id.clone()) {
                    warn!(error = %e, "grant does not match session");
                    return;
                }
                self.attach_capture();
                info!(participant = %participant_id, "remote control granted");
                self.publish();
                self.observer.notice(Notice::Started(participant_id));
            }
            Decision::Denied { participant_id } => {
                self.capture.detach();
                self.session.reset();
                info!(participant = %participant_id, "remote control denied");
                self.publish();
                self.observer
                    .notice(Notice::AuthorizationDenied(participant_id));
            }
            Decision::Cancelled { .. } => {
                self.capture.detach();
                if self.session.reset().is_some() {
                    self.publish();
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Reports whether `participant` can be controlled.
    pub fn availability(&self, participant: &ParticipantId) -> ControlAvailability {
        if !self.host.has_active_session() {
            return ControlAvailability::NotAvailable;
        }
        if self.session.involves(participant) {
            return ControlAvailability::Active;
        }
        if self.host.is_sharing_screen(participant) {
            ControlAvailability::Available
        } else {
            ControlAvailability::NotAvailable
        }
    }

    fn attach_capture(&mut self) {
        // The session stays active without listeners; input simply does not flow.
        if let Err(e) = self.capture.attach() {
            warn!(error = %e, "failed to attach pointer capture");
        }
    }

    fn publish(&self) {
        self.observer.session_changed(&self.session);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
