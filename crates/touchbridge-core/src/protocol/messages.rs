//! Inbound message types delivered by the remote-control session.
//!
//! Pointer and touch events carry an integer mask.  The mask values are fixed
//! by the remote-control protocol (they reuse the sender's button-state
//! bitmask plus custom extensions for the wheel and touch-pan phases), so they
//! are declared here as named constants and decoded exactly once into the
//! [`PointerMask`] and [`TouchMask`] enums.  Everything downstream matches on
//! the enums; no other module compares raw integers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Protocol mask codes ───────────────────────────────────────────────────────

/// Pointer mask codes as sent by the remote session.
pub mod mask {
    /// Pointer moved with no button held.
    pub const MOVE: i32 = 0;
    /// Pointer moved with the primary button held.
    pub const PRIMARY_MOVE: i32 = 8;
    pub const PRIMARY_DOWN: i32 = 9;
    pub const PRIMARY_UP: i32 = 10;
    pub const SECONDARY_DOWN: i32 = 17;
    pub const SECONDARY_UP: i32 = 18;
    pub const WHEEL_BUTTON_DOWN: i32 = 33;
    pub const WHEEL_BUTTON_UP: i32 = 34;
    pub const WHEEL_SCROLL_DOWN: i32 = 523_331;
    pub const WHEEL_SCROLL_UP: i32 = 963;

    pub const TOUCH_SCALE_START: i32 = 1;
    pub const TOUCH_SCALE: i32 = 2;
    pub const TOUCH_SCALE_END: i32 = 3;
    pub const TOUCH_PAN_START: i32 = 4;
    pub const TOUCH_PAN_UPDATE: i32 = 5;
    pub const TOUCH_PAN_END: i32 = 6;
}

/// Errors raised while decoding an inbound event.
///
/// A decode error means the event is malformed; the caller drops it without
/// touching any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown pointer mask: {0}")]
    UnknownPointerMask(i32),
    #[error("unknown touch mask: {0}")]
    UnknownTouchMask(i32),
    #[error("invalid unicode code point: 0x{0:X}")]
    InvalidCodePoint(u32),
}

// ── Pointer masks ─────────────────────────────────────────────────────────────

/// Semantic pointer event decoded from a mask code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerMask {
    /// Plain or primary-held move; both codes mean "the pointer is now here".
    Move,
    PrimaryDown,
    PrimaryUp,
    SecondaryDown,
    SecondaryUp,
    WheelButtonDown,
    WheelButtonUp,
    WheelScrollUp,
    WheelScrollDown,
}

impl TryFrom<i32> for PointerMask {
    type Error = DecodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            mask::MOVE | mask::PRIMARY_MOVE => Ok(PointerMask::Move),
            mask::PRIMARY_DOWN => Ok(PointerMask::PrimaryDown),
            mask::PRIMARY_UP => Ok(PointerMask::PrimaryUp),
            mask::SECONDARY_DOWN => Ok(PointerMask::SecondaryDown),
            mask::SECONDARY_UP => Ok(PointerMask::SecondaryUp),
            mask::WHEEL_BUTTON_DOWN => Ok(PointerMask::WheelButtonDown),
            mask::WHEEL_BUTTON_UP => Ok(PointerMask::WheelButtonUp),
            mask::WHEEL_SCROLL_UP => Ok(PointerMask::WheelScrollUp),
            mask::WHEEL_SCROLL_DOWN => Ok(PointerMask::WheelScrollDown),
            other => Err(DecodeError::UnknownPointerMask(other)),
        }
    }
}

// ── Touch masks ───────────────────────────────────────────────────────────────

/// Semantic touch event decoded from a mask code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchMask {
    ScaleStart,
    Scale,
    ScaleEnd,
    PanStart,
    PanUpdate,
    PanEnd,
}

impl TryFrom<i32> for TouchMask {
    type Error = DecodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            mask::TOUCH_SCALE_START => Ok(TouchMask::ScaleStart),
            mask::TOUCH_SCALE => Ok(TouchMask::Scale),
            mask::TOUCH_SCALE_END => Ok(TouchMask::ScaleEnd),
            mask::TOUCH_PAN_START => Ok(TouchMask::PanStart),
            mask::TOUCH_PAN_UPDATE => Ok(TouchMask::PanUpdate),
            mask::TOUCH_PAN_END => Ok(TouchMask::PanEnd),
            other => Err(DecodeError::UnknownTouchMask(other)),
        }
    }
}

// ── Key events ────────────────────────────────────────────────────────────────

/// How the remote keyboard is being interpreted by the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardMode {
    /// Raw character stream: key-downs may carry a Unicode code point.
    Legacy,
    /// Key codes only; nothing is ever committed as text.
    Map,
    /// Composed text: key-downs may carry an already-composed sequence.
    Translate,
}

/// A key event as sent by the remote session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventMessage {
    pub mode: KeyboardMode,
    /// Unicode code point, meaningful in [`KeyboardMode::Legacy`].
    pub chr: Option<u32>,
    /// Composed text, meaningful in [`KeyboardMode::Translate`].
    pub seq: Option<String>,
    /// Host key code (see [`crate::keymap`]).
    pub key_code: u32,
    pub down: bool,
}

impl KeyEventMessage {
    /// Returns the text this event asks to commit, if any.
    ///
    /// Only key-down events commit text: a Legacy event with a character or a
    /// Translate event with a non-empty sequence.  Everything else is a raw
    /// key code.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidCodePoint`] if a Legacy character is not a
    /// valid Unicode scalar value.
    pub fn text_to_commit(&self) -> Result<Option<String>, DecodeError> {
        if !self.down {
            return Ok(None);
        }
        match self.mode {
            KeyboardMode::Legacy => match self.chr {
                Some(code) => char::from_u32(code)
                    .map(|c| Some(c.to_string()))
                    .ok_or(DecodeError::InvalidCodePoint(code)),
                None => Ok(None),
            },
            KeyboardMode::Translate => Ok(self.seq.clone().filter(|s| !s.is_empty())),
            KeyboardMode::Map => Ok(None),
        }
    }
}

// ── Inbound envelope ──────────────────────────────────────────────────────────

/// Any event the transport hands to a session, before mask decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundEvent {
    /// Absolute pointer event in device-local, unscaled coordinates.
    Pointer { mask: i32, x: i32, y: i32 },
    /// Touch event.  For pan updates `x`/`y` are deltas, otherwise positions.
    Touch { mask: i32, x: i32, y: i32 },
    Key(KeyEventMessage),
}
