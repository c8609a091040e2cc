//! Application layer: the input synthesis engine.
//!
//! Everything here is synchronous and deterministic.  Components receive the
//! current time as an argument and request side effects through traits, so
//! the whole engine can be driven step by step from unit tests.
//!
//! # What does each module do?
//!
//! - **`host`** – Traits describing the host injection surface: stroke
//!   dispatch, global actions, the UI element tree and the optional
//!   input-method connection.
//!
//! - **`tuning`** – Named timing and distance constants, grouped into
//!   [`tuning::GestureTuning`] and [`tuning::WheelTuning`].
//!
//! - **`stroke_queue`** – FIFO of strokes with at most one in flight.
//!
//! - **`gesture`** – Builds start, continue and end strokes from pointer
//!   positions and feeds the stroke queue.
//!
//! - **`press`** – Decides whether a primary press is a tap, a drag or a
//!   long-press, and drops bounced downs.
//!
//! - **`wheel`** – Turns wheel ticks into short swipes, one at a time.
//!
//! - **`router`** – Decodes pointer and touch masks and drives the modules
//!   above.
//!
//! - **`focus`** – Lists the UI elements that might accept typed text.
//!
//! - **`shadow_text`** – Computes text edits through a scratch editor.
//!
//! - **`key_injector`** – Entry point for key events.

pub mod focus;
pub mod gesture;
pub mod host;
pub mod key_injector;
pub mod press;
pub mod router;
pub mod shadow_text;
pub mod stroke_queue;
pub mod tuning;
pub mod wheel;
