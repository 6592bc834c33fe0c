//! Pointer capture on the shared-screen rendering surface.
//!
//! The host application owns the actual surface (a video element, a native
//! view) and the platform listeners on it.  A [`PointerSource`] installs those
//! listeners and pushes every raw event into a tokio channel; the event loop
//! reads the channel and hands each event to [`InputCapture::translate`].
//!
//! # Generations
//!
//! All attaches share one channel, so events queued before a `detach` can
//! still be read after the next `attach`.  Each attach therefore hands the
//! source an [`InputSink`] stamped with a fresh generation, and `translate`
//! drops any [`CapturedInput`] whose generation is not the current one.  Input
//! captured for one participant never reaches the next.
//!
//! # Scoped attach/detach
//!
//! Listeners exist only while a control session is active.  The session
//! controller calls [`InputCapture::attach`] on entry to the active state and
//! [`InputCapture::detach`] on every exit.  Both are idempotent, so the source
//! sees exactly one `attach` and one `detach` per active period no matter how
//! many exit paths fire.  Dropping an attached capture detaches it.
//!
//! # Testability
//!
//! [`mock::MockPointerSource`] counts attach/detach calls and lets tests inject
//! synthetic events without a real surface.

use std::sync::Arc;

use rc_core::{ControlEvent, NormalizedPoint, SurfaceBounds};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

pub mod mock;

/// A raw event as reported by the surface's listeners.
///
/// Positions are in client coordinates, the same space as [`SurfaceBounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInputEvent {
    MouseMove { client_x: f64, client_y: f64 },
    MouseDown { client_x: f64, client_y: f64 },
    MouseUp { client_x: f64, client_y: f64 },
    /// The pointer entered the surface.
    MouseEnter,
    /// The pointer left the surface.
    MouseLeave,
    /// Touch activity.  Not a pointer source; ignored.
    Touch { phase: TouchPhase },
}

/// A raw event stamped with the attach generation that captured it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedInput {
    pub generation: u64,
    pub event: RawInputEvent,
}

/// Sender handed to a [`PointerSource`] for one attach.
#[derive(Debug, Clone)]
pub struct InputSink {
    generation: u64,
    tx: UnboundedSender<CapturedInput>,
}

impl InputSink {
    pub fn new(generation: u64, tx: UnboundedSender<CapturedInput>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forwards one raw event.  Returns `false` once the receiver is gone.
    pub fn send(&self, event: RawInputEvent) -> bool {
        self.tx
            .send(CapturedInput {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl RawInputEvent {
    /// Returns `true` for events produced by a pointer (mouse) device.
    pub fn is_pointer(&self) -> bool {
        !matches!(self, Self::Touch { .. })
    }
}

/// A pointer event after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(NormalizedPoint),
    Down(NormalizedPoint),
    Up(NormalizedPoint),
    Enter,
    Leave,
}

impl PointerEvent {
    /// Maps the event onto the wire vocabulary.
    pub fn to_control_event(self) -> ControlEvent {
        match self {
            Self::Move(p) => ControlEvent::PointerMove(p),
            Self::Down(p) => ControlEvent::PointerDown(p),
            Self::Up(p) => ControlEvent::PointerUp(p),
            Self::Enter => ControlEvent::PointerShow,
            Self::Leave => ControlEvent::PointerHide,
        }
    }
}

/// Error type for input capture operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// There is no rendering surface to attach to.
    #[error("no rendering surface available")]
    SurfaceUnavailable,
    /// The platform refused the listeners.
    #[error("failed to install pointer listeners: {0}")]
    ListenerInstallFailed(String),
}

/// Installs and removes pointer listeners on the rendering surface.
pub trait PointerSource: Send + Sync {
    /// Installs listeners that forward every raw event into `sink`.
    fn attach(&self, sink: InputSink) -> Result<(), CaptureError>;

    /// Removes the listeners.  No event is forwarded after this returns.
    fn detach(&self);
}

/// Scoped owner of the pointer listeners.
pub struct InputCapture {
    source: Arc<dyn PointerSource>,
    sink: UnboundedSender<CapturedInput>,
    generation: u64,
    attached: bool,
}

impl InputCapture {
    /// Creates a detached capture that will forward raw events into `sink`.
    pub fn new(source: Arc<dyn PointerSource>, sink: UnboundedSender<CapturedInput>) -> Self {
        Self {
            source,
            sink,
            generation: 0,
            attached: false,
        }
    }

    /// Installs the listeners if they are not installed yet.
    ///
    /// # Errors
    ///
    /// Propagates [`CaptureError`] from the source; the capture stays detached.
    pub fn attach(&mut self) -> Result<(), CaptureError> {
        if self.attached {
            return Ok(());
        }
        let generation = self.generation.wrapping_add(1);
        self.source.attach(InputSink::new(generation, self.sink.clone()))?;
        self.generation = generation;
        self.attached = true;
        debug!(generation, "pointer capture attached");
        Ok(())
    }

    /// Removes the listeners if they are installed.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.source.detach();
        self.attached = false;
        debug!("pointer capture detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Generation of the latest successful attach; `0` before the first.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Converts a raw event into a normalized [`PointerEvent`].
    ///
    /// Returns `None` when the capture is detached, the event was captured by
    /// an earlier attach, the event does not come from a pointer device, or a
    /// positional event arrives while the surface has no usable bounds.
    pub fn translate(
        &self,
        input: &CapturedInput,
        bounds: Option<SurfaceBounds>,
    ) -> Option<PointerEvent> {
        let raw = &input.event;
        if !self.attached {
            trace!(?raw, "dropping input while detached");
            return None;
        }
        if input.generation != self.generation {
            trace!(
                ?raw,
                stale = input.generation,
                current = self.generation,
                "dropping input from an earlier attach"
            );
            return None;
        }
        if !raw.is_pointer() {
            trace!(?raw, "ignoring non-pointer input");
            return None;
        }

        let normalize = |client_x: f64, client_y: f64| {
            let point = bounds.and_then(|b| b.normalize(client_x, client_y));
            if point.is_none() {
                debug!(?bounds, "rendering surface unavailable, dropping pointer event");
            }
            point
        };

        match *raw {
            RawInputEvent::MouseMove { client_x, client_y } => {
                normalize(client_x, client_y).map(PointerEvent::Move)
            }
            RawInputEvent::MouseDown { client_x, client_y } => {
                normalize(client_x, client_y).map(PointerEvent::Down)
            }
            RawInputEvent::MouseUp { client_x, client_y } => {
                normalize(client_x, client_y).map(PointerEvent::Up)
            }
            RawInputEvent::MouseEnter => Some(PointerEvent::Enter),
            RawInputEvent::MouseLeave => Some(PointerEvent::Leave),
            RawInputEvent::Touch { .. } => None,
        }
    }
}

impl Drop for InputCapture {
    fn drop(&mut self) {
        self.detach();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
