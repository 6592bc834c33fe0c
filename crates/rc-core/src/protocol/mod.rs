//! Protocol module containing event types and the JSON frame codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_frame, ControlFrame, Envelope, ProtocolError};
pub use messages::*;
