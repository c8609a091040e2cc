//! Domain value types for TouchBridge.
//!
//! This module contains pure data with no infrastructure dependencies.
//!
//! # Why a separate domain layer? (for beginners)
//!
//! The gesture engine, the wheel batcher and the session actor all exchange
//! the same handful of values: a point on the screen, the pointer state, and
//! strokes.  Keeping them here, free of any async runtime or host API, means
//! they can be constructed and asserted on in plain unit tests.

/// Screen coordinates and rectangles.
pub mod geometry;

/// The remote pointer position and button state.
pub mod pointer;

/// Strokes, global actions, and scroll directions.
pub mod stroke;
