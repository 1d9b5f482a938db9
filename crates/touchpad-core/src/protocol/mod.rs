//! Protocol module containing the inbound message types and the JSON codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_event, ProtocolError};
pub use messages::*;
