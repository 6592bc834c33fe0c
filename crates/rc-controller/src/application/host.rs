//! The host-session collaborator.
//!
//! Conference establishment, media, and transport all belong to the host
//! application.  This crate consumes exactly the capabilities listed on
//! [`HostSession`]; membership changes and inbound messages are pushed in by
//! the host through [`crate::infrastructure::event_loop::ControlHandle`].

use rc_core::{ParticipantId, SurfaceBounds};
use serde_json::Value;
use thiserror::Error;

/// Failures reported by the host's messaging primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No conference is joined.
    #[error("no live host session")]
    NoSession,

    /// The transport refused or failed to send the message.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Capabilities the host session lends to the control core.
///
/// Implementations must not block: sends are fire-and-forget.
pub trait HostSession: Send + Sync {
    /// Returns `true` while a conference is joined.
    fn has_active_session(&self) -> bool;

    /// Sends `payload` to a single participant through the endpoint-message channel.
    fn send_endpoint_message(&self, to: &ParticipantId, payload: Value) -> Result<(), HostError>;

    /// Returns the current client-space bounds of the shared-screen surface.
    fn rendering_surface_bounds(&self) -> Option<SurfaceBounds>;

    /// Returns `true` if `participant` is currently sharing a desktop/screen track.
    fn is_sharing_screen(&self, participant: &ParticipantId) -> bool;
}
