//! Focus resolution: which UI elements might accept typed text.
//!
//! The host reports two focus notions (input focus and accessibility focus)
//! and neither is guaranteed to point at an editable element.  A text field
//! is often wrapped in a focusable container, or the focus sits on a sibling
//! label.  [`resolve_candidates`] builds an ordered list of elements to try:
//!
//! 1. the input-focused element, if it is editable and focusable
//! 2. the accessibility-focused element, same rule
//! 3. the first editable descendant of the input-focused element
//! 4. the first editable descendant of the accessibility-focused element
//! 5. the root of the active window
//! 6. the focused elements that failed the rule in 1 and 2, as a last resort
//!
//! The list is built fresh for every key event and never cached.

use std::collections::HashSet;

use tracing::debug;

use super::host::{FocusKind, HostSurface, NodeId, NodeRef};

/// Whether an element can take a text edit directly.
pub fn is_edit_target(node: &NodeRef) -> bool {
    node.is_editable() && node.is_focusable()
}

/// Finds the first editable and focusable element below `root`.
///
/// Direct children are checked before descending, so a shallow text field
/// wins over a deeply nested one.  `root` itself is considered first.
pub fn find_editable_descendant(root: &NodeRef) -> Option<NodeRef> {
    if is_edit_target(root) {
        return Some(root.clone());
    }
    let children = root.children();
    if let Some(child) = children.iter().find(|c| is_edit_target(c)) {
        return Some(child.clone());
    }
    children.iter().find_map(find_editable_descendant)
}

/// Ordered list of distinct elements, keyed by [`NodeId`].
#[derive(Default)]
struct CandidateList {
    nodes: Vec<NodeRef>,
    seen: HashSet<NodeId>,
}

impl CandidateList {
    fn push(&mut self, node: NodeRef) {
        if self.seen.insert(node.id()) {
            self.nodes.push(node);
        }
    }
}

/// Builds the candidate list for one key event.
pub fn resolve_candidates(host: &dyn HostSurface) -> Vec<NodeRef> {
    let input = host.find_focus(FocusKind::Input);
    let accessibility = host.find_focus(FocusKind::Accessibility);

    let mut list = CandidateList::default();
    let mut deferred = Vec::new();

    for focused in [&input, &accessibility].into_iter().flatten() {
        if is_edit_target(focused) {
            list.push(focused.clone());
        } else {
            deferred.push(focused.clone());
        }
    }

    for focused in [&input, &accessibility].into_iter().flatten() {
        if let Some(found) = find_editable_descendant(focused) {
            list.push(found);
        }
    }

    if let Some(root) = host.root_in_active_window() {
        list.push(root);
    }

    for node in deferred {
        list.push(node);
    }

    debug!(
        candidates = ?list.nodes.iter().map(|n| n.id().0).collect::<Vec<_>>(),
        "resolved edit candidates"
    );
    list.nodes
}
