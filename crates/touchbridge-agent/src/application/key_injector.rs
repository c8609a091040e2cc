//! KeyEventInjector: top-level entry for remote key events.
//!
//! A key event either carries text to commit (a Legacy key-down with a
//! character, or a Translate key-down with a composed sequence) or it is a
//! raw key code.  Which host channel is used depends on the host:
//!
//! - hosts with an input-method connection receive the text through
//!   `commit_text` and raw keys through `send_key_event`;
//! - other hosts get a structural edit: the candidate elements from
//!   [`super::focus`] are tried in order, each through the
//!   [`TextStateSynchronizer`], until one accepts the new text.

use thiserror::Error;
use touchbridge_core::{DecodeError, KeyEventMessage};
use tracing::{debug, info};

use super::focus::resolve_candidates;
use super::host::{HostKeyEvent, HostSurface, NodeId};
use super::shadow_text::{ShadowEditor, TextEdit, TextMirror, TextStateSynchronizer};

/// How a key event reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInjection {
    /// Text committed through the input-method connection.
    Committed,
    /// Raw key sent through the input-method connection.
    KeySent,
    /// Structural edit accepted by this element.
    Edited { node: NodeId },
}

/// Errors returned by [`KeyEventInjector::inject`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectError {
    #[error("malformed key event: {0}")]
    Malformed(#[from] DecodeError),

    #[error("host advertises an input method but no connection is open")]
    NoInputConnection,

    #[error("input connection rejected the event")]
    Rejected,

    #[error("no element accepted the edit ({tried} candidates tried)")]
    NoEditTarget { tried: usize },
}

/// Injects key events into the host.
pub struct KeyEventInjector<E: ShadowEditor = TextMirror> {
    sync: TextStateSynchronizer<E>,
}

impl Default for KeyEventInjector<TextMirror> {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEventInjector<TextMirror> {
    pub fn new() -> Self {
        Self {
            sync: TextStateSynchronizer::default(),
        }
    }
}

impl<E: ShadowEditor> KeyEventInjector<E> {
    /// Uses `editor` for structural edits instead of the built-in mirror.
    pub fn with_editor(editor: E) -> Self {
        Self {
            sync: TextStateSynchronizer::new(editor),
        }
    }

    /// Delivers one key event.
    ///
    /// # Errors
    ///
    /// - [`InjectError::Malformed`] if a Legacy character is not a valid code
    ///   point; nothing is sent.
    /// - [`InjectError::NoInputConnection`] / [`InjectError::Rejected`] on
    ///   input-method hosts.
    /// - [`InjectError::NoEditTarget`] when every candidate element refused the
    ///   edit.
    pub fn inject(
        &mut self,
        host: &dyn HostSurface,
        event: &KeyEventMessage,
    ) -> Result<KeyInjection, InjectError> {
        let text = event.text_to_commit()?;
        debug!(?event, text = ?text, "key event");

        if host.supports_input_method() {
            return Self::inject_via_input_method(host, event, text.as_deref());
        }

        let edit = match text.as_deref() {
            Some(commit) => TextEdit::Commit(commit),
            None => TextEdit::Key(HostKeyEvent::from(event)),
        };
        let candidates = resolve_candidates(host);
        for node in &candidates {
            if self.sync.apply(node, edit) {
                info!(node = node.id().0, "edit accepted");
                return Ok(KeyInjection::Edited { node: node.id() });
            }
            debug!(node = node.id().0, "edit refused; trying next candidate");
        }
        Err(InjectError::NoEditTarget {
            tried: candidates.len(),
        })
    }

    fn inject_via_input_method(
        host: &dyn HostSurface,
        event: &KeyEventMessage,
        text: Option<&str>,
    ) -> Result<KeyInjection, InjectError> {
        let connection = host
            .input_connection()
            .ok_or(InjectError::NoInputConnection)?;
        match text {
            Some(text) => {
                if connection.commit_text(text) {
                    Ok(KeyInjection::Committed)
                } else {
                    Err(InjectError::Rejected)
                }
            }
            None => {
                if connection.send_key_event(&HostKeyEvent::from(event)) {
                    Ok(KeyInjection::KeySent)
                } else {
                    Err(InjectError::Rejected)
                }
            }
        }
    }
}
