//! Shadow text state: computing edits for hosts without a text-commit channel.
//!
//! On such hosts the only way to change an element's text is to replace it
//! wholesale with a `SetText` action and then place the caret with
//! `SetSelection`.  To know *what* to send, the element's current text and
//! selection are copied into a scratch editor (the "shadow"), the edit is
//! applied there, and the shadow's result is written back.
//!
//! # Why a scratch editor? (for beginners)
//!
//! Typing "a" with the caret in the middle of a word, or pressing Backspace
//! after an emoji made of several code points, is easy to get subtly wrong by
//! hand.  A real editor already knows the rules, so the synchronizer lets the
//! editor do the work and only diffs the outcome.  [`TextMirror`] is the
//! built-in editor; a host with a native editor widget can plug that in
//! through the [`ShadowEditor`] trait instead.
//!
//! All offsets are `char` offsets.

use touchbridge_core::{EditKey, Rect};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use super::host::{HostKeyEvent, KeyAction, NodeAction, NodeRef};

// ── Editor seam ───────────────────────────────────────────────────────────────

/// A scratch text editor the synchronizer can drive.
pub trait ShadowEditor {
    /// Replaces the content.  The caret moves to the start.
    fn set_text(&mut self, text: &str);

    /// Empties the content.
    fn clear(&mut self);

    /// Selects `start..end`, clamped to the content.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Inserts `text` at `at`.  Selection bounds at or after `at` move right.
    fn insert(&mut self, at: usize, text: &str);

    /// Prepares the editor for key handling at the element's on-screen size.
    fn layout(&mut self, bounds: Rect);

    /// Replays a key press.  Returns whether the key was handled.
    fn on_key_down(&mut self, key_code: u32) -> bool;

    /// Replays a key release.  Returns whether the key was handled.
    fn on_key_up(&mut self, key_code: u32) -> bool;

    fn text(&self) -> &str;

    /// Current selection as `(start, end)` with `start <= end`.
    fn selection(&self) -> (usize, usize);
}

// ── TextMirror ────────────────────────────────────────────────────────────────

/// Built-in [`ShadowEditor`] over a plain `String`.
///
/// Caret movement and deletion step over whole grapheme clusters, so a flag
/// emoji or a letter with a combining accent is removed by one Backspace.
/// Cluster boundaries are computed by [`ShadowEditor::layout`]; keys replayed
/// before the first layout are not handled.
#[derive(Debug, Default, Clone)]
pub struct TextMirror {
    text: String,
    start: usize,
    end: usize,
    /// Grapheme boundaries as char offsets, including `0` and the length.
    boundaries: Vec<usize>,
    laid_out: bool,
}

impl TextMirror {
    pub fn new() -> Self {
        Self::default()
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    fn reflow(&mut self) {
        let mut offset = 0;
        self.boundaries.clear();
        self.boundaries.push(0);
        for grapheme in self.text.graphemes(true) {
            offset += grapheme.chars().count();
            self.boundaries.push(offset);
        }
    }

    fn invalidate(&mut self) {
        self.laid_out = false;
        self.boundaries.clear();
    }

    fn prev_boundary(&self, from: usize) -> usize {
        self.boundaries.iter().rev().copied().find(|&b| b < from).unwrap_or(0)
    }

    fn next_boundary(&self, from: usize) -> usize {
        let len = self.char_len();
        self.boundaries.iter().copied().find(|&b| b > from).unwrap_or(len)
    }

    fn floor_boundary(&self, at: usize) -> usize {
        self.boundaries.iter().rev().copied().find(|&b| b <= at).unwrap_or(0)
    }

    fn replace_range(&mut self, start: usize, end: usize, with: &str) {
        let (from, to) = (self.byte_offset(start), self.byte_offset(end));
        self.text.replace_range(from..to, with);
        let caret = start + with.chars().count();
        self.start = caret;
        self.end = caret;
        self.reflow();
    }

    fn collapse_to(&mut self, caret: usize) {
        self.start = caret;
        self.end = caret;
    }

    /// Char offsets of the start and end of the line holding `at`.
    fn line_bounds(&self, at: usize) -> (usize, usize) {
        let chars: Vec<char> = self.text.chars().collect();
        let start = chars[..at].iter().rposition(|&c| c == '\n').map_or(0, |i| i + 1);
        let end = chars[at..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(chars.len(), |i| at + i);
        (start, end)
    }

    fn vertical_move(&mut self, up: bool) {
        let caret = self.end;
        let (line_start, line_end) = self.line_bounds(caret);
        let column = caret - line_start;
        let target = if up {
            if line_start == 0 {
                0
            } else {
                let (prev_start, prev_end) = self.line_bounds(line_start - 1);
                (prev_start + column).min(prev_end)
            }
        } else if line_end == self.char_len() {
            line_end
        } else {
            let (next_start, next_end) = self.line_bounds(line_end + 1);
            (next_start + column).min(next_end)
        };
        let snapped = self.floor_boundary(target);
        self.collapse_to(snapped);
    }

    fn apply_key(&mut self, key: EditKey) {
        let (start, end) = (self.start, self.end);
        let has_selection = start != end;
        match key {
            EditKey::Del => {
                if has_selection {
                    self.replace_range(start, end, "");
                } else if start > 0 {
                    let prev = self.prev_boundary(start);
                    self.replace_range(prev, start, "");
                }
            }
            EditKey::ForwardDel => {
                if has_selection {
                    self.replace_range(start, end, "");
                } else if start < self.char_len() {
                    let next = self.next_boundary(start);
                    self.replace_range(start, next, "");
                }
            }
            EditKey::DpadLeft => {
                let caret = if has_selection { start } else { self.prev_boundary(start) };
                self.collapse_to(caret);
            }
            EditKey::DpadRight => {
                let caret = if has_selection { end } else { self.next_boundary(end) };
                self.collapse_to(caret);
            }
            EditKey::DpadUp => self.vertical_move(true),
            EditKey::DpadDown => self.vertical_move(false),
            EditKey::MoveHome => {
                let (line_start, _) = self.line_bounds(start);
                self.collapse_to(line_start);
            }
            EditKey::MoveEnd => {
                let (_, line_end) = self.line_bounds(end);
                self.collapse_to(line_end);
            }
            EditKey::Tab | EditKey::Space | EditKey::Enter | EditKey::NumpadEnter => {
                if let Some(inserted) = key.inserted_text() {
                    self.replace_range(start, end, inserted);
                }
            }
        }
    }
}

impl ShadowEditor for TextMirror {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.collapse_to(0);
        self.invalidate();
    }

    fn clear(&mut self) {
        self.set_text("");
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let end = end.min(len);
        self.start = start.min(end);
        self.end = end;
    }

    fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.char_len());
        let byte = self.byte_offset(at);
        self.text.insert_str(byte, text);
        let shift = text.chars().count();
        if self.start >= at {
            self.start += shift;
        }
        if self.end >= at {
            self.end += shift;
        }
        if self.laid_out {
            self.reflow();
        }
    }

    fn layout(&mut self, bounds: Rect) {
        debug!(width = bounds.width(), height = bounds.height(), "laying out text mirror");
        self.reflow();
        self.laid_out = true;
    }

    fn on_key_down(&mut self, key_code: u32) -> bool {
        if !self.laid_out {
            debug!(key_code, "key replayed before layout; ignored");
            return false;
        }
        match EditKey::from_code(key_code) {
            Some(key) => {
                self.apply_key(key);
                true
            }
            None => false,
        }
    }

    fn on_key_up(&mut self, key_code: u32) -> bool {
        self.laid_out && EditKey::from_code(key_code).is_some()
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

// ── Synchronizer ──────────────────────────────────────────────────────────────

/// Clamps a reported selection to `len` chars.
///
/// Returns `None` when the element reports no selection (a negative bound).
/// An inverted selection collapses onto its end.
pub fn normalize_selection(len: usize, start: i32, end: i32) -> Option<(usize, usize)> {
    if start < 0 || end < 0 {
        return None;
    }
    let end = (end as usize).min(len);
    let start = (start as usize).min(len).min(end);
    Some((start, end))
}

/// The edit to apply to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit<'a> {
    /// Insert text at the caret.
    Commit(&'a str),
    /// Replay a raw key against the element's text.
    Key(HostKeyEvent),
}

/// Applies edits to UI elements through a [`ShadowEditor`].
pub struct TextStateSynchronizer<E: ShadowEditor = TextMirror> {
    editor: E,
}

impl<E: ShadowEditor + Default> Default for TextStateSynchronizer<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

impl<E: ShadowEditor> TextStateSynchronizer<E> {
    pub fn new(editor: E) -> Self {
        Self { editor }
    }

    /// The shadow editor, holding the result of the last edit.
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Applies `edit` to `node`.  Returns whether the element accepted the new
    /// text.
    pub fn apply(&mut self, node: &NodeRef, edit: TextEdit<'_>) -> bool {
        if !node.refresh() {
            debug!(node = node.id().0, "element is gone");
            return false;
        }
        self.editor.clear();
        self.editor.set_selection(0, 0);

        let text = if node.is_showing_hint() {
            String::new()
        } else {
            node.text().unwrap_or_default()
        };
        let selection = normalize_selection(
            text.chars().count(),
            node.selection_start(),
            node.selection_end(),
        );
        debug!(
            node = node.id().0,
            existing = %text,
            ?selection,
            ?edit,
            "applying edit"
        );

        match edit {
            TextEdit::Commit(commit) => match selection {
                None => {
                    self.editor.set_text(commit);
                    self.write_text(node)
                }
                Some((start, end)) => {
                    self.editor.set_text(&text);
                    self.editor.set_selection(start, end);
                    self.editor.insert(start, commit);
                    self.write_text_and_selection(node)
                }
            },
            TextEdit::Key(key) => {
                self.editor.set_text(&text);
                if let Some((start, end)) = selection {
                    self.editor.set_selection(start, end);
                }
                self.editor.layout(node.bounds_in_screen());
                let handled = match key.action {
                    KeyAction::Down => self.editor.on_key_down(key.key_code),
                    KeyAction::Up => self.editor.on_key_up(key.key_code),
                };
                debug!(key_code = key.key_code, action = ?key.action, handled, "key replayed");
                self.write_text_and_selection(node)
            }
        }
    }

    fn write_text(&self, node: &NodeRef) -> bool {
        let accepted = node.perform_action(&NodeAction::SetText(self.editor.text().to_string()));
        debug!(node = node.id().0, accepted, "set text");
        accepted
    }

    fn write_text_and_selection(&self, node: &NodeRef) -> bool {
        if !self.write_text(node) {
            return false;
        }
        if node.supports_selection() {
            let (start, end) = self.editor.selection();
            if !node.perform_action(&NodeAction::SetSelection { start, end }) {
                warn!(node = node.id().0, start, end, "set selection rejected");
            }
        }
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
