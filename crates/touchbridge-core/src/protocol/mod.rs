//! Protocol module containing inbound message types, mask decoding, and the
//! inbound frame codec.

pub mod codec;
pub mod messages;
pub mod sequence;

pub use codec::{decode_event, encode_event, ProtocolError};
pub use messages::*;
pub use sequence::{DispatchTicket, TicketCounter};
