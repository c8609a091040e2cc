//! Binary codec for inbound event frames.
//!
//! Wire format:
//! ```text
//! [version:1][kind:1][reserved:2][payload_len:4][payload:N]
//! ```
//! Total header size: 8 bytes.  All multi-byte integers are big-endian.
//!
//! Pointer and touch payloads are three big-endian `i32`s (`mask`, `x`, `y`).
//! Key payloads are the `bincode` encoding of [`KeyEventMessage`], which keeps
//! the optional character and sequence fields self-describing.

use thiserror::Error;
use tracing::debug;

use crate::protocol::messages::{InboundEvent, KeyEventMessage};

/// Current frame version byte.
pub const FRAME_VERSION: u8 = 0x01;

/// Size of the frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

const KIND_POINTER: u8 = 0x01;
const KIND_TOUCH: u8 = 0x02;
const KIND_KEY: u8 = 0x03;

const POSITIONAL_PAYLOAD_SIZE: usize = 12;

/// Errors that can occur during frame encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the minimum required length.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The frame version is not supported.
    #[error("unsupported frame version: {0}")]
    UnsupportedVersion(u8),

    /// The kind byte in the header is not a recognized value.
    #[error("unknown event kind: 0x{0:02X}")]
    UnknownKind(u8),

    /// The payload could not be parsed.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`InboundEvent`] into a complete frame.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if the key message cannot be
/// serialized.
pub fn encode_event(event: &InboundEvent) -> Result<Vec<u8>, ProtocolError> {
    let (kind, payload) = match event {
        InboundEvent::Pointer { mask, x, y } => (KIND_POINTER, encode_positional(*mask, *x, *y)),
        InboundEvent::Touch { mask, x, y } => (KIND_TOUCH, encode_positional(*mask, *x, *y)),
        InboundEvent::Key(key) => (
            KIND_KEY,
            bincode::serialize(key).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?,
        ),
    };

    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    buf.push(FRAME_VERSION);
    buf.push(kind);
    buf.push(0x00); // reserved
    buf.push(0x00); // reserved
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decodes one [`InboundEvent`] from the beginning of `bytes`.
///
/// Returns the event and the number of bytes consumed so a stream reader can
/// advance its cursor.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the frame is truncated, has an unknown version
/// or kind, or carries an unparseable payload.
pub fn decode_event(bytes: &[u8]) -> Result<(InboundEvent, usize), ProtocolError> {
    if bytes.len() < FRAME_HEADER_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: FRAME_HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let version = bytes[0];
    if version != FRAME_VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }
    let kind = bytes[1];
    let payload_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let total = FRAME_HEADER_SIZE + payload_len;
    if bytes.len() < total {
        return Err(ProtocolError::InsufficientData {
            needed: total,
            available: bytes.len(),
        });
    }
    let payload = &bytes[FRAME_HEADER_SIZE..total];

    let event = match kind {
        KIND_POINTER => {
            let (mask, x, y) = decode_positional(payload)?;
            InboundEvent::Pointer { mask, x, y }
        }
        KIND_TOUCH => {
            let (mask, x, y) = decode_positional(payload)?;
            InboundEvent::Touch { mask, x, y }
        }
        KIND_KEY => {
            let key: KeyEventMessage = bincode::deserialize(payload).map_err(|e| {
                debug!("key payload rejected: {e}");
                ProtocolError::MalformedPayload(e.to_string())
            })?;
            InboundEvent::Key(key)
        }
        other => return Err(ProtocolError::UnknownKind(other)),
    };

    Ok((event, total))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn encode_positional(mask: i32, x: i32, y: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(POSITIONAL_PAYLOAD_SIZE);
    buf.extend_from_slice(&mask.to_be_bytes());
    buf.extend_from_slice(&x.to_be_bytes());
    buf.extend_from_slice(&y.to_be_bytes());
    buf
}

fn decode_positional(payload: &[u8]) -> Result<(i32, i32, i32), ProtocolError> {
    if payload.len() != POSITIONAL_PAYLOAD_SIZE {
        return Err(ProtocolError::MalformedPayload(format!(
            "positional payload must be {POSITIONAL_PAYLOAD_SIZE} bytes, got {}",
            payload.len()
        )));
    }
    let read = |i: usize| {
        i32::from_be_bytes([payload[i], payload[i + 1], payload[i + 2], payload[i + 3]])
    };
    Ok((read(0), read(4), read(8)))
}
