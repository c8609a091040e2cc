//! Host key codes for keys that edit text.
//!
//! Key events that do not carry text are forwarded to the host as raw key
//! codes.  The codes use the host's own numbering (the same numbering the
//! input-method channel expects), so forwarding needs no translation.  The
//! shadow editor, however, has to *understand* a handful of them to replay
//! them against a mirrored text buffer; [`EditKey`] names exactly those.

pub mod host;

pub use host::EditKey;
