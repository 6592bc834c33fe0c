//! Integration tests for the session lifecycle laws.
//!
//! Drives a `SessionController` wired to recording doubles through the public
//! API only, the same way a host application would.

use std::sync::Arc;
use std::time::Duration;

use rc_controller::application::authorize::AuthorizationNegotiator;
use rc_controller::application::control_session::SessionController;
use rc_controller::application::mock::RecordingObserver;
use rc_controller::infrastructure::input_capture::mock::MockPointerSource;
use rc_controller::infrastructure::input_capture::{CapturedInput, InputCapture};
use rc_controller::infrastructure::message_channel::mock::RecordingHost;
use rc_controller::infrastructure::message_channel::MessageChannel;
use rc_controller::infrastructure::timer::mock::ManualTickScheduler;
use rc_core::{ControlEvent, ControlFlavor, Envelope, ParticipantId, SessionState};
use tokio::sync::mpsc;

fn pid(id: &str) -> ParticipantId {
    ParticipantId::from(id)
}

struct Fixture {
    controller: SessionController,
    host: Arc<RecordingHost>,
    source: Arc<MockPointerSource>,
    scheduler: Arc<ManualTickScheduler>,
    observer: Arc<RecordingObserver>,
    _raw_input: mpsc::UnboundedReceiver<CapturedInput>,
}

fn fixture(flavor: ControlFlavor) -> Fixture {
    let host = Arc::new(RecordingHost::new());
    let source = Arc::new(MockPointerSource::new());
    let scheduler = Arc::new(ManualTickScheduler::new());
    let observer = Arc::new(RecordingObserver::new());
    let (raw_tx, raw_input) = mpsc::unbounded_channel();
    let controller = SessionController::new(
        flavor,
        host.clone(),
        MessageChannel::new(host.clone(), Envelope::Plain),
        InputCapture::new(source.clone(), raw_tx),
        AuthorizationNegotiator::new(scheduler.clone(), 5, Duration::from_secs(1)),
        observer.clone(),
    );
    Fixture {
        controller,
        host,
        source,
        scheduler,
        observer,
        _raw_input: raw_input,
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start(&'static str),
    Stop,
    Left(&'static str),
    Grant,
    Deny,
}

fn apply(f: &mut Fixture, op: Op) {
    match op {
        Op::Start(id) => f.controller.start(pid(id)),
        Op::Stop => f.controller.stop(),
        Op::Left(id) => f.controller.on_participant_left(&pid(id)),
        Op::Grant => f.controller.respond_to_authorization(true),
        Op::Deny => f.controller.respond_to_authorization(false),
    }
}

// ── Exclusivity ───────────────────────────────────────────────────────────────

#[test]
fn test_at_most_one_controlled_participant_across_operation_sequences() {
    let ops = [
        Op::Start("p1"),
        Op::Start("p2"),
        Op::Left("p1"),
        Op::Start("p3"),
        Op::Grant,
        Op::Stop,
        Op::Stop,
        Op::Start("p1"),
        Op::Left("p2"),
        Op::Deny,
        Op::Start("p2"),
        Op::Left("p2"),
        Op::Start("p3"),
    ];

    for flavor in [ControlFlavor::Direct, ControlFlavor::Negotiated] {
        let mut f = fixture(flavor);
        for op in ops {
            apply(&mut f, op);

            let session = f.controller.session();
            assert_eq!(
                session.controlled_id().is_some(),
                !session.is_idle(),
                "{flavor:?} after {op:?}"
            );
            // Listeners exist exactly while active.
            assert_eq!(
                f.source.is_attached(),
                session.is_active(),
                "{flavor:?} after {op:?}"
            );
        }

        // Every snapshot ever published names at most one participant, and
        // a different participant only appears after an idle snapshot.
        let mut current: Option<ParticipantId> = None;
        for snapshot in f.observer.snapshots() {
            match (snapshot.controlled_id(), current.as_ref()) {
                (Some(next), Some(prev)) => assert_eq!(next, prev, "{flavor:?}"),
                (Some(next), None) => current = Some(next.clone()),
                (None, _) => current = None,
            }
        }
    }
}

// ── Idempotence ───────────────────────────────────────────────────────────────

#[test]
fn test_stop_twice_produces_exactly_one_stop_frame() {
    // Arrange
    let mut f = fixture(ControlFlavor::Direct);
    f.controller.start(pid("p1"));

    // Act
    f.controller.stop();
    f.controller.stop();

    // Assert
    assert_eq!(f.host.count_of(ControlEvent::Stop), 1);
    assert_eq!(f.controller.session().state(), SessionState::Idle);
}

// ── Cleanup law ───────────────────────────────────────────────────────────────

#[test]
fn test_controlled_participant_leaving_sends_stop_and_returns_to_idle() {
    // Arrange
    let mut f = fixture(ControlFlavor::Direct);
    f.controller.start(pid("P1"));

    // Act
    f.controller.on_participant_left(&pid("P1"));

    // Assert
    assert!(f.controller.session().is_idle());
    assert_eq!(
        f.host.sent_events().last(),
        Some(&(pid("P1"), ControlEvent::Stop))
    );
}

#[test]
fn test_other_participant_leaving_changes_nothing() {
    let mut f = fixture(ControlFlavor::Direct);
    f.controller.start(pid("P1"));
    let sent_before = f.host.sent().len();

    f.controller.on_participant_left(&pid("P7"));

    assert!(f.controller.session().is_active());
    assert_eq!(f.controller.session().controlled_id(), Some(&pid("P1")));
    assert_eq!(f.host.sent().len(), sent_before);
}

// ── No host session ───────────────────────────────────────────────────────────

#[test]
fn test_start_without_host_session_sends_nothing() {
    let mut f = fixture(ControlFlavor::Negotiated);
    f.host.set_session_live(false);

    f.controller.start(pid("P2"));

    assert!(f.host.sent().is_empty());
    assert_eq!(f.controller.session().state(), SessionState::Idle);
    assert_eq!(f.scheduler.scheduled_count(), 0);
}

// ── Timer law ─────────────────────────────────────────────────────────────────

#[test]
fn test_timeout_yields_one_activation_and_one_cancellation() {
    // Arrange
    let mut f = fixture(ControlFlavor::Negotiated);
    f.controller.start(pid("p1"));
    let id = f
        .scheduler
        .last_request_id()
        .expect("countdown scheduled");

    // Act
    for _ in 0..20 {
        f.controller.on_authorization_tick(id);
    }

    // Assert
    assert_eq!(f.observer.transitions_to(SessionState::Active), 1);
    assert_eq!(f.scheduler.scheduled_count(), 1);
    assert_eq!(f.scheduler.cancelled_count(), 1);
}

#[test]
fn test_explicit_grant_before_timeout_yields_one_activation() {
    // Arrange
    let mut f = fixture(ControlFlavor::Negotiated);
    f.controller.start(pid("p1"));
    let id = f.scheduler.last_request_id().expect("countdown scheduled");
    f.controller.on_authorization_tick(id);

    // Act
    f.controller.respond_to_authorization(true);
    for _ in 0..20 {
        f.controller.on_authorization_tick(id);
    }

    // Assert
    assert!(f.controller.session().is_active());
    assert_eq!(f.observer.transitions_to(SessionState::Active), 1);
    assert_eq!(f.scheduler.cancelled_count(), 1);
}

#[test]
fn test_every_exit_from_pending_releases_timer_once() {
    let exits: [fn(&mut Fixture); 4] = [
        |f| f.controller.stop(),
        |f| f.controller.on_participant_left(&pid("p1")),
        |f| f.controller.respond_to_authorization(false),
        |f| {
            f.controller
                .on_inbound_message(&pid("p1"), &serde_json::json!({
                    "name": "remote-control-protocol",
                    "type": "deny"
                }))
        },
    ];

    for exit in exits {
        let mut f = fixture(ControlFlavor::Negotiated);
        f.controller.start(pid("p1"));

        exit(&mut f);
        f.controller.stop();

        assert!(f.controller.session().is_idle());
        assert_eq!(f.scheduler.scheduled_count(), 1);
        assert_eq!(f.scheduler.cancelled_count(), 1);
    }
}
