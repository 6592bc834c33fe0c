//! Infrastructure layer for remote pointer control.
//!
//! Contains the adapters that touch the outside world: pointer listeners on
//! the rendering surface, protocol framing over the host's messaging
//! primitive, the countdown timer, configuration loading, and the event loop
//! that serializes all of them onto one task.

pub mod event_loop;
pub mod input_capture;
pub mod message_channel;
pub mod storage;
pub mod timer;
