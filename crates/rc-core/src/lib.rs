//! # rc-core
//!
//! Shared library for remote pointer control containing the session model,
//! rendering-surface geometry, and the control-message wire protocol.
//!
//! This crate is used by both sides of a control session: the controller that
//! sends pointer commands and the controlled peer that acts on them.
//! It has zero dependencies on async runtimes, host transports, or UI toolkits.
//!
//! # Architecture overview (for beginners)
//!
//! One participant in a real-time session (the *controller*) drives the
//! pointer of another participant's device (the *controlled participant*).
//! Frames travel over a messaging channel the host session already provides;
//! this crate only decides what those frames look like.
//!
//! - **`domain`** – Pure state and geometry.  [`Session`] records whether a
//!   control session is idle, waiting for authorization, or active, and who is
//!   being controlled.  [`SurfaceBounds`] turns raw pixel positions into
//!   [`NormalizedPoint`]s in the unit square.
//!
//! - **`protocol`** – The closed set of [`ControlEvent`]s and the JSON frame
//!   codec that carries them inside the host's endpoint messages.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `rc_core::Session` instead of `rc_core::domain::session::Session`.
pub use domain::participant::ParticipantId;
pub use domain::session::{Session, SessionError, SessionState};
pub use domain::surface::{NormalizedPoint, SurfaceBounds};
pub use protocol::codec::{decode_frame, encode_frame, ControlFrame, Envelope, ProtocolError};
pub use protocol::messages::{ControlEvent, ControlFlavor, EventKind};
