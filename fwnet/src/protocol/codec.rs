use crate::error::{FwError, Result};
use crate::protocol::header::{HEADER_SIZE, Header, MAX_FRAME_SIZE, MessageType};
use crate::protocol::message::FwMessage;

/// Encode an `FwMessage` into a framed byte buffer: `[header][rkyv payload]`.
pub fn encode_message(msg: &FwMessage) -> Result<Vec<u8>> {
    let payload = rkyv::to_bytes::<rkyv::rancor::Error>(msg)
        .map_err(|e| FwError::EncodeFailed(e.to_string()))?;

    if payload.len() > MAX_FRAME_SIZE {
        return Err(FwError::EncodeFailed(format!(
            "payload of {} bytes exceeds frame limit {MAX_FRAME_SIZE}",
            payload.len()
        )));
    }

    let header = Header {
        payload_length: payload.len() as u32,
        message_type: MessageType::Message,
    };

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode an rkyv payload that has already been split from its header.
pub fn decode_payload(payload: &[u8]) -> Result<FwMessage> {
    // Archived rows hold u64 cells; copy into an aligned buffer before validation.
    let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(payload.len());
    aligned.extend_from_slice(payload);
    rkyv::from_bytes::<FwMessage, rkyv::rancor::Error>(&aligned)
        .map_err(|e| FwError::DecodeFailed(e.to_string()))
}
