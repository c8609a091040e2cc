//! The boundary to the host injection surface.
//!
//! The host is the platform service that turns strokes into on-screen touch
//! input and exposes the UI element tree.  Everything here is a trait: the
//! application layer never talks to a concrete platform API, and tests plug
//! in the recording mocks from `infrastructure::host::mock`.

use std::sync::Arc;

use async_trait::async_trait;
use touchbridge_core::{GlobalAction, KeyEventMessage, Rect, Stroke, StrokeOutcome};

/// Shared handle to a UI element.
///
/// Handles are only held for the duration of one key event; the tree is
/// queried again for the next one.
pub type NodeRef = Arc<dyn UiNode>;

/// Stable identity of a UI element, used to de-duplicate candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Which focus the host is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusKind {
    /// The element receiving keyboard input.
    Input,
    /// The element the accessibility cursor rests on.
    Accessibility,
}

/// A structural edit issued against a UI element.
///
/// Selection offsets are `char` offsets into the element's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    SetText(String),
    SetSelection { start: usize, end: usize },
}

/// Key transition of a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A raw key event in host terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostKeyEvent {
    pub key_code: u32,
    pub action: KeyAction,
}

impl From<&KeyEventMessage> for HostKeyEvent {
    fn from(event: &KeyEventMessage) -> Self {
        Self {
            key_code: event.key_code,
            action: if event.down { KeyAction::Down } else { KeyAction::Up },
        }
    }
}

/// One element of the host's UI tree.
pub trait UiNode: Send + Sync {
    fn id(&self) -> NodeId;

    /// Re-reads the element's state from the host.  Returns `false` if the
    /// element no longer exists.
    fn refresh(&self) -> bool;

    /// Current text, `None` if the element has no text at all.
    fn text(&self) -> Option<String>;

    /// Reported selection start, `-1` when there is no selection.
    fn selection_start(&self) -> i32;

    /// Reported selection end, `-1` when there is no selection.
    fn selection_end(&self) -> i32;

    fn is_editable(&self) -> bool;

    fn is_focusable(&self) -> bool;

    /// Whether [`UiNode::text`] is placeholder text rather than content.
    fn is_showing_hint(&self) -> bool {
        false
    }

    fn bounds_in_screen(&self) -> Rect {
        Rect::default()
    }

    fn children(&self) -> Vec<NodeRef>;

    /// Whether the element accepts [`NodeAction::SetSelection`].
    fn supports_selection(&self) -> bool {
        true
    }

    /// Performs a structural action.  Returns whether the host accepted it.
    fn perform_action(&self, action: &NodeAction) -> bool;
}

/// Direct input-method channel offered by capable hosts.
#[cfg_attr(test, mockall::automock)]
pub trait InputConnection: Send + Sync {
    fn commit_text(&self, text: &str) -> bool;

    fn send_key_event(&self, event: &HostKeyEvent) -> bool;
}

/// The host injection surface.
#[async_trait]
pub trait HostSurface: Send + Sync {
    /// Plays one stroke.  Resolves when the host reports the stroke as
    /// completed or cancelled.
    ///
    /// The host accepts one stroke sequence at a time; callers are
    /// responsible for serializing dispatches.
    async fn dispatch_stroke(&self, stroke: Stroke) -> StrokeOutcome;

    /// Performs a system navigation action.  Returns whether it was accepted.
    fn perform_global_action(&self, action: GlobalAction) -> bool;

    fn find_focus(&self, kind: FocusKind) -> Option<NodeRef>;

    fn root_in_active_window(&self) -> Option<NodeRef>;

    /// Whether the host can commit text through an input-method channel.
    fn supports_input_method(&self) -> bool {
        false
    }

    /// The current input-method connection, if one is open.
    fn input_connection(&self) -> Option<Arc<dyn InputConnection>> {
        None
    }
}
