//! # touchbridge-core
//!
//! Shared library for TouchBridge containing the inbound event messages,
//! mask-code decoding, the inbound frame codec, gesture value types, and the
//! host key-code table.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or the host
//! injection surface.
//!
//! # Architecture overview (for beginners)
//!
//! TouchBridge turns a remote operator's mouse, wheel, touch and keyboard
//! events into input on a device that can only be driven through a
//! high-level "synthesize this touch path" and "edit this UI element"
//! interface.  There is no raw mouse to move: a click has to be drawn as a
//! very short touch stroke, a drag as a chain of continued strokes, and typed
//! text has to be written into an editable element of the UI tree.
//!
//! This crate (`touchbridge-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – What arrives from the remote session.  Pointer and touch
//!   events carry an integer *mask* whose values are fixed by the protocol;
//!   they are decoded exactly once into tagged enums.  Key events are a
//!   structured message that may also arrive as an encoded byte frame.
//!
//! - **`domain`** – Pure value types with no OS dependencies: points, the
//!   pointer state, strokes (one dispatchable piece of a touch path), global
//!   actions and scroll directions.
//!
//! - **`keymap`** – The host key codes understood by the shadow editor when a
//!   raw key (Backspace, arrows, Enter…) has to be replayed against text.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `touchbridge_core::Stroke` instead of `touchbridge_core::domain::stroke::Stroke`.
pub use domain::geometry::{Point, Rect};
pub use domain::pointer::PointerState;
pub use domain::stroke::{GlobalAction, ScrollDirection, Stroke, StrokeOutcome, StrokePath};
pub use keymap::EditKey;
pub use protocol::codec::{decode_event, encode_event, ProtocolError};
pub use protocol::messages::{
    DecodeError, InboundEvent, KeyEventMessage, KeyboardMode, PointerMask, TouchMask,
};
