pub(crate) mod codec;
pub(crate) mod header;
mod message;

pub use codec::{decode_payload, encode_message};
pub use header::{HEADER_SIZE, Header, MAX_FRAME_SIZE, MessageType};
pub use message::FwMessage;
