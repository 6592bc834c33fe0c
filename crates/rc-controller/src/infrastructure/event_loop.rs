//! The single task that owns the session controller.
//!
//! # Why one task? (for beginners)
//!
//! Three independent sources can change the session at any moment: commands
//! from the host (start, stop, membership changes, inbound frames), raw
//! pointer input from the attached surface, and countdown ticks.  Instead of
//! guarding the controller with a lock, all three feed unbounded channels and
//! one task `select!`s over them, handling one message at a time.  The
//! controller is therefore mutated by exactly one writer, and a tick can never
//! interleave with an explicit grant halfway through.
//!
//! ```text
//!  ControlHandle ──commands──┐
//!  PointerSource ──raw input─┼──► ControlLoop::run ──► SessionController
//!  TickScheduler ──ticks─────┘
//! ```
//!
//! Session snapshots leave the loop through a [`SessionObserver`];
//! [`SessionWatch`] exposes them as `tokio::sync::watch` receivers.

use std::sync::Arc;

use rc_core::{ParticipantId, Session};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::application::authorize::AuthorizationNegotiator;
use crate::application::control_session::{Notice, SessionController, SessionObserver};
use crate::application::host::HostSession;
use crate::infrastructure::input_capture::{CapturedInput, InputCapture, PointerSource};
use crate::infrastructure::message_channel::MessageChannel;
use crate::infrastructure::storage::config::ControlConfig;
use crate::infrastructure::timer::{RequestId, TokioTickScheduler};

/// A request delivered to the control loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    Start(ParticipantId),
    Stop,
    ParticipantLeft(ParticipantId),
    InboundMessage { from: ParticipantId, payload: Value },
    RespondToAuthorization(bool),
    Shutdown,
}

/// Cloneable sender side of the control loop.
///
/// Every method returns `false` once the loop has exited.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    commands: mpsc::UnboundedSender<ControlCommand>,
}

impl ControlHandle {
    pub fn send(&self, command: ControlCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn start(&self, participant: ParticipantId) -> bool {
        self.send(ControlCommand::Start(participant))
    }

    pub fn stop(&self) -> bool {
        self.send(ControlCommand::Stop)
    }

    /// Host callback for membership changes.
    pub fn participant_left(&self, participant: ParticipantId) -> bool {
        self.send(ControlCommand::ParticipantLeft(participant))
    }

    /// Host callback for endpoint messages addressed to this endpoint.
    pub fn inbound_message(&self, from: ParticipantId, payload: Value) -> bool {
        self.send(ControlCommand::InboundMessage { from, payload })
    }

    pub fn respond_to_authorization(&self, granted: bool) -> bool {
        self.send(ControlCommand::RespondToAuthorization(granted))
    }

    pub fn shutdown(&self) -> bool {
        self.send(ControlCommand::Shutdown)
    }
}

/// Owns the controller and the receiving ends of its three input channels.
pub struct ControlLoop {
    controller: SessionController,
    commands: mpsc::UnboundedReceiver<ControlCommand>,
    raw_input: mpsc::UnboundedReceiver<CapturedInput>,
    ticks: mpsc::UnboundedReceiver<RequestId>,
}

impl ControlLoop {
    /// Wires a controller from `config` and the host's collaborators.
    ///
    /// Nothing is spawned until [`run`](Self::run) is awaited and a
    /// negotiated session starts its countdown.
    pub fn new(
        config: &ControlConfig,
        host: Arc<dyn HostSession>,
        source: Arc<dyn PointerSource>,
        observer: Arc<dyn SessionObserver>,
    ) -> (Self, ControlHandle) {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (raw_tx, raw_input) = mpsc::unbounded_channel();
        let (tick_tx, ticks) = mpsc::unbounded_channel();

        let channel = MessageChannel::new(Arc::clone(&host), config.envelope);
        let capture = InputCapture::new(source, raw_tx);
        let negotiator = AuthorizationNegotiator::new(
            Arc::new(TokioTickScheduler::new(tick_tx)),
            config.countdown_seconds,
            config.tick_interval(),
        );
        let controller =
            SessionController::new(config.flavor, host, channel, capture, negotiator, observer);

        let control_loop = Self {
            controller,
            commands,
            raw_input,
            ticks,
        };
        (control_loop, ControlHandle { commands: command_tx })
    }

    /// Processes inputs until [`ControlHandle::shutdown`] or until every
    /// handle is dropped, then stops any open session.
    pub async fn run(mut self) {
        info!(flavor = ?self.controller.flavor(), "control loop started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ControlCommand::Shutdown) | None => break,
                    Some(command) => self.dispatch(command),
                },
                Some(input) = self.raw_input.recv() => {
                    self.controller.on_raw_input(input);
                }
                Some(request_id) = self.ticks.recv() => {
                    self.controller.on_authorization_tick(request_id);
                }
            }
        }
        self.controller.stop();
        info!("control loop stopped");
    }

    fn dispatch(&mut self, command: ControlCommand) {
        debug!(?command, "control command");
        match command {
            ControlCommand::Start(participant) => self.controller.start(participant),
            ControlCommand::Stop => self.controller.stop(),
            ControlCommand::ParticipantLeft(participant) => {
                self.controller.on_participant_left(&participant)
            }
            ControlCommand::InboundMessage { from, payload } => {
                self.controller.on_inbound_message(&from, &payload)
            }
            ControlCommand::RespondToAuthorization(granted) => {
                self.controller.respond_to_authorization(granted)
            }
            ControlCommand::Shutdown => {}
        }
    }
}

// ── Session watch ─────────────────────────────────────────────────────────────

/// A [`SessionObserver`] that republishes through `tokio::sync::watch`.
///
/// Receivers always see the latest snapshot; intermediate ones may be skipped,
/// which is what a cursor overlay or menu button wants.
pub struct SessionWatch {
    session: watch::Sender<Session>,
    notice: watch::Sender<Option<Notice>>,
}

impl SessionWatch {
    pub fn new() -> Self {
        Self {
            session: watch::Sender::new(Session::new()),
            notice: watch::Sender::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn subscribe_notices(&self) -> watch::Receiver<Option<Notice>> {
        self.notice.subscribe()
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for SessionWatch {
    fn session_changed(&self, session: &Session) {
        self.session.send_replace(session.clone());
    }

    fn notice(&self, notice: Notice) {
        self.notice.send_replace(Some(notice));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::input_capture::mock::MockPointerSource;
    use crate::infrastructure::message_channel::mock::RecordingHost;
    use rc_core::{ControlEvent, SessionState};

    fn pid(id: &str) -> ParticipantId {
        ParticipantId::from(id)
    }

    #[tokio::test]
    async fn test_start_and_shutdown_through_handle() {
        // Arrange
        let host = Arc::new(RecordingHost::new());
        let watch = Arc::new(SessionWatch::new());
        let mut sessions = watch.subscribe();
        let (control_loop, handle) = ControlLoop::new(
            &ControlConfig::default(),
            host.clone(),
            Arc::new(MockPointerSource::new()),
            watch.clone(),
        );
        let task = tokio::spawn(control_loop.run());

        // Act
        assert!(handle.start(pid("p1")));
        sessions.changed().await.unwrap();
        let active = sessions.borrow_and_update().state();
        handle.shutdown();
        task.await.unwrap();

        // Assert
        assert_eq!(active, SessionState::Active);
        assert_eq!(
            host.sent_events(),
            vec![(pid("p1"), ControlEvent::Start), (pid("p1"), ControlEvent::Stop)]
        );
        assert!(sessions.borrow().is_idle());
        assert!(!handle.stop());
    }

    #[tokio::test]
    async fn test_dropping_every_handle_ends_loop() {
        let (control_loop, handle) = ControlLoop::new(
            &ControlConfig::default(),
            Arc::new(RecordingHost::new()),
            Arc::new(MockPointerSource::new()),
            Arc::new(SessionWatch::new()),
        );
        let task = tokio::spawn(control_loop.run());

        drop(handle);

        task.await.unwrap();
    }

    #[test]
    fn test_session_watch_publishes_latest_notice() {
        let watch = SessionWatch::new();
        let notices = watch.subscribe_notices();

        watch.notice(Notice::Started(pid("p1")));
        watch.notice(Notice::Stopped(pid("p1")));

        assert_eq!(*notices.borrow(), Some(Notice::Stopped(pid("p1"))));
    }
}
