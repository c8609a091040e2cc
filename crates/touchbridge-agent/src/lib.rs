//! touchbridge-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the agent do? (for beginners)
//!
//! The agent runs on the controlled device.  A remote operator moves a mouse,
//! turns a wheel, pans on a touchpad and types; those events arrive here as
//! small messages.  The device, however, offers no way to move a cursor or
//! press a key.  It only accepts two kinds of request:
//!
//! 1. "Play this touch path" (a stroke), answered asynchronously with
//!    completed or cancelled.
//! 2. "Set the text of this UI element" and "select this range".
//!
//! The agent bridges the gap:
//!
//! - a click becomes a very short stroke, a drag a chain of strokes that the
//!   host joins into one touch, a long hold a long-press;
//! - a wheel tick becomes a short vertical swipe;
//! - the secondary and wheel buttons become Back, Home and Recents;
//! - typed text is committed through the input method when the host has one,
//!   or written into the focused text field otherwise.
//!
//! The `application` layer holds the decision logic; the `infrastructure`
//! layer runs it on tokio (session actor, timers) and provides the
//! configuration loader, the event-script replay and a mock host.

/// Application layer: gesture synthesis and key injection.
pub mod application;

/// Infrastructure layer: session actor, timers, configuration, replay.
pub mod infrastructure;
