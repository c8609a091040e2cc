//! Recording host and UI tree for tests and dry runs.
//!
//! # Why a mock host?
//!
//! The real host is a platform accessibility service that:
//!
//! - Only exists on the controlled device.
//! - Actually plays touches and edits text on screen.
//! - Reports stroke completion through callbacks that cannot be observed
//!   from Rust test code.
//!
//! [`MockHost`] plays each stroke by sleeping for its duration on the tokio
//! clock and records what it was asked to do.  Every record is kept in a
//! `Mutex<Vec<...>>` so tests can share the host through an `Arc` and inspect
//! the exact order and timing afterwards.  With a paused test clock the
//! recorded timestamps are exact.
//!
//! [`MockNode`] is an element of a fake UI tree.  Accepted `SetText` and
//! `SetSelection` actions update its state, so a second key event sees the
//! result of the first one.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use async_trait::async_trait;
use tokio::time::{self, Instant};
use touchbridge_core::{GlobalAction, Rect, Stroke, StrokeOutcome};
use tracing::{debug, info};

use crate::application::host::{
    FocusKind, HostSurface, InputConnection, NodeAction, NodeId, NodeRef, UiNode,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── MockHost ──────────────────────────────────────────────────────────────────

/// One stroke played by the mock host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub stroke: Stroke,
    pub started: Instant,
    pub finished: Instant,
}

/// A host that records every request.
#[derive(Default)]
pub struct MockHost {
    /// Strokes in the order they finished playing.
    pub dispatches: Mutex<Vec<DispatchRecord>>,
    /// Global actions in the order they were performed.
    pub global_actions: Mutex<Vec<GlobalAction>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    cancel_strokes: bool,
    input_focus: Option<NodeRef>,
    accessibility_focus: Option<NodeRef>,
    root: Option<NodeRef>,
    input_method: bool,
    connection: Option<Arc<dyn InputConnection>>,
}

impl MockHost {
    /// Creates a host with no UI tree and no input method.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_focus(mut self, kind: FocusKind, node: NodeRef) -> Self {
        match kind {
            FocusKind::Input => self.input_focus = Some(node),
            FocusKind::Accessibility => self.accessibility_focus = Some(node),
        }
        self
    }

    pub fn with_root(mut self, node: NodeRef) -> Self {
        self.root = Some(node);
        self
    }

    /// Offers an input-method connection.
    pub fn with_input_connection(mut self, connection: Arc<dyn InputConnection>) -> Self {
        self.input_method = true;
        self.connection = Some(connection);
        self
    }

    /// Claims input-method support without an open connection.
    pub fn advertising_input_method(mut self) -> Self {
        self.input_method = true;
        self
    }

    /// Reports every stroke as cancelled after playing it.
    pub fn cancelling_strokes(mut self) -> Self {
        self.cancel_strokes = true;
        self
    }

    /// Snapshot of the played strokes.
    pub fn dispatched(&self) -> Vec<DispatchRecord> {
        lock(&self.dispatches).clone()
    }

    /// Snapshot of the performed global actions.
    pub fn actions(&self) -> Vec<GlobalAction> {
        lock(&self.global_actions).clone()
    }

    /// Highest number of strokes that were playing at the same time.
    pub fn max_concurrent_strokes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostSurface for MockHost {
    async fn dispatch_stroke(&self, stroke: Stroke) -> StrokeOutcome {
        let started = Instant::now();
        let playing = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(playing, Ordering::SeqCst);
        debug!(
            from = ?stroke.path.first(),
            to = ?stroke.path.last(),
            duration = ?stroke.duration,
            will_continue = stroke.will_continue,
            "playing stroke"
        );

        time::sleep(stroke.start_delay + stroke.duration).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let finished = Instant::now();
        lock(&self.dispatches).push(DispatchRecord {
            stroke,
            started,
            finished,
        });
        if self.cancel_strokes {
            StrokeOutcome::Cancelled
        } else {
            StrokeOutcome::Completed
        }
    }

    fn perform_global_action(&self, action: GlobalAction) -> bool {
        info!(?action, "global action");
        lock(&self.global_actions).push(action);
        true
    }

    fn find_focus(&self, kind: FocusKind) -> Option<NodeRef> {
        match kind {
            FocusKind::Input => self.input_focus.clone(),
            FocusKind::Accessibility => self.accessibility_focus.clone(),
        }
    }

    fn root_in_active_window(&self) -> Option<NodeRef> {
        self.root.clone()
    }

    fn supports_input_method(&self) -> bool {
        self.input_method
    }

    fn input_connection(&self) -> Option<Arc<dyn InputConnection>> {
        self.connection.clone()
    }
}

// ── MockNode ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct NodeState {
    text: Option<String>,
    selection: (i32, i32),
    showing_hint: bool,
}

/// An element of a fake UI tree.
///
/// Built with the `with_*` methods and frozen into an `Arc` by
/// [`MockNode::into_ref`].
#[derive(Debug)]
pub struct MockNode {
    id: NodeId,
    editable: bool,
    focusable: bool,
    accepts_text: bool,
    selection_support: bool,
    attached: bool,
    bounds: Rect,
    children: Vec<Arc<MockNode>>,
    state: Mutex<NodeState>,
    actions: Mutex<Vec<NodeAction>>,
}

impl MockNode {
    /// A non-editable, non-focusable element with no text and no selection.
    pub fn new(id: u64) -> Self {
        Self {
            id: NodeId(id),
            editable: false,
            focusable: false,
            accepts_text: true,
            selection_support: true,
            attached: true,
            bounds: Rect::default(),
            children: Vec::new(),
            state: Mutex::new(NodeState {
                text: None,
                selection: (-1, -1),
                showing_hint: false,
            }),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// An editable, focusable text field.
    pub fn editable(id: u64, text: &str) -> Arc<Self> {
        Self::new(id).with_text(text).edit_target().into_ref()
    }

    /// A plain element wrapping `children`.
    pub fn container(id: u64, children: Vec<Arc<MockNode>>) -> Arc<Self> {
        Self::new(id).with_children(children).into_ref()
    }

    pub fn with_text(self, text: &str) -> Self {
        lock(&self.state).text = Some(text.to_string());
        self
    }

    pub fn with_selection(self, start: i32, end: i32) -> Self {
        lock(&self.state).selection = (start, end);
        self
    }

    pub fn with_children(mut self, children: Vec<Arc<MockNode>>) -> Self {
        self.children = children;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Makes the element editable and focusable.
    pub fn edit_target(mut self) -> Self {
        self.editable = true;
        self.focusable = true;
        self
    }

    /// Marks the current text as placeholder text.
    pub fn showing_hint(self) -> Self {
        lock(&self.state).showing_hint = true;
        self
    }

    /// Refuses every `SetText`.
    pub fn rejecting_text(mut self) -> Self {
        self.accepts_text = false;
        self
    }

    pub fn without_selection_support(mut self) -> Self {
        self.selection_support = false;
        self
    }

    /// Fails `refresh`, as an element removed from the screen does.
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    pub fn into_ref(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every action the element was asked to perform, accepted or not.
    pub fn actions(&self) -> Vec<NodeAction> {
        lock(&self.actions).clone()
    }

    pub fn text_value(&self) -> Option<String> {
        lock(&self.state).text.clone()
    }

    pub fn selection_value(&self) -> (i32, i32) {
        lock(&self.state).selection
    }
}

impl UiNode for MockNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn refresh(&self) -> bool {
        self.attached
    }

    fn text(&self) -> Option<String> {
        lock(&self.state).text.clone()
    }

    fn selection_start(&self) -> i32 {
        lock(&self.state).selection.0
    }

    fn selection_end(&self) -> i32 {
        lock(&self.state).selection.1
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn is_focusable(&self) -> bool {
        self.focusable
    }

    fn is_showing_hint(&self) -> bool {
        lock(&self.state).showing_hint
    }

    fn bounds_in_screen(&self) -> Rect {
        self.bounds
    }

    fn children(&self) -> Vec<NodeRef> {
        self.children
            .iter()
            .map(|child| Arc::clone(child) as NodeRef)
            .collect()
    }

    fn supports_selection(&self) -> bool {
        self.selection_support
    }

    fn perform_action(&self, action: &NodeAction) -> bool {
        lock(&self.actions).push(action.clone());
        let mut state = lock(&self.state);
        match action {
            NodeAction::SetText(text) => {
                if !self.accepts_text {
                    return false;
                }
                state.text = Some(text.clone());
                state.showing_hint = false;
                true
            }
            NodeAction::SetSelection { start, end } => {
                if !self.selection_support {
                    return false;
                }
                state.selection = (*start as i32, *end as i32);
                true
            }
        }
    }
}
