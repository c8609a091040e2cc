//! Host key-code table.
//!
//! # Why only editing keys? (for beginners)
//!
//! Printable characters never reach the shadow editor as key codes: the
//! sender either attaches the character to the key-down (Legacy mode) or
//! sends the composed text (Translate mode), and that text is committed
//! directly.  What is left are the keys that *change* text or move the caret
//! without producing a character of their own.  Any other code maps to
//! `None` and is left for the host to interpret.

use serde::{Deserialize, Serialize};

/// A key the shadow editor knows how to replay.
///
/// The numeric value of each variant is its host key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum EditKey {
    DpadUp = 19,
    DpadDown = 20,
    DpadLeft = 21,
    DpadRight = 22,
    Tab = 61,
    Space = 62,
    Enter = 66,
    /// Backspace: deletes the selection or the grapheme before the caret.
    Del = 67,
    /// Delete: deletes the selection or the grapheme after the caret.
    ForwardDel = 112,
    MoveHome = 122,
    MoveEnd = 123,
    NumpadEnter = 160,
}

impl EditKey {
    /// Looks up a host key code.
    ///
    /// Returns `None` for codes the shadow editor does not replay.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            19 => Some(EditKey::DpadUp),
            20 => Some(EditKey::DpadDown),
            21 => Some(EditKey::DpadLeft),
            22 => Some(EditKey::DpadRight),
            61 => Some(EditKey::Tab),
            62 => Some(EditKey::Space),
            66 => Some(EditKey::Enter),
            67 => Some(EditKey::Del),
            112 => Some(EditKey::ForwardDel),
            122 => Some(EditKey::MoveHome),
            123 => Some(EditKey::MoveEnd),
            160 => Some(EditKey::NumpadEnter),
            _ => None,
        }
    }

    /// The host key code of this key.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Text inserted by this key, for keys that insert text.
    pub fn inserted_text(self) -> Option<&'static str> {
        match self {
            EditKey::Tab => Some("\t"),
            EditKey::Space => Some(" "),
            EditKey::Enter | EditKey::NumpadEnter => Some("\n"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_and_code_agree_for_every_key() {
        let keys = [
            EditKey::DpadUp,
            EditKey::DpadDown,
            EditKey::DpadLeft,
            EditKey::DpadRight,
            EditKey::Tab,
            EditKey::Space,
            EditKey::Enter,
            EditKey::Del,
            EditKey::ForwardDel,
            EditKey::MoveHome,
            EditKey::MoveEnd,
            EditKey::NumpadEnter,
        ];
        for key in keys {
            assert_eq!(EditKey::from_code(key.code()), Some(key), "{key:?}");
        }
    }

    #[test]
    fn test_letter_codes_are_not_edit_keys() {
        // KEYCODE_A
        assert_eq!(EditKey::from_code(29), None);
    }

    #[test]
    fn test_only_whitespace_keys_insert_text() {
        assert_eq!(EditKey::Enter.inserted_text(), Some("\n"));
        assert_eq!(EditKey::NumpadEnter.inserted_text(), Some("\n"));
        assert_eq!(EditKey::Del.inserted_text(), None);
    }
}
