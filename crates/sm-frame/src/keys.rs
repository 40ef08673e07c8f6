//! Keyboard classification.
//!
//! Some keys move the caret or replace the selection wholesale, which
//! invalidates the popup's anchor. Releasing Shift may have just extended
//! a keyboard selection, so it triggers a fresh resolve.

/// What a key event means for the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// The selection is about to change; hide the menu.
    Hide,
    /// A keyboard selection may have just been made; resolve it.
    Resolve,
}

/// Keys that move the caret without editing.
pub const CARET_KEYS: &[&str] = &[
    "ArrowLeft",
    "ArrowUp",
    "ArrowRight",
    "ArrowDown",
    "Home",
    "End",
    "PageUp",
    "PageDown",
];

pub struct KeyMap;

impl KeyMap {
    /// Classify a `keydown`.
    ///
    /// Select-all is matched on the physical `code` so it works on every
    /// keyboard layout; Ctrl and Cmd are treated alike.
    pub fn key_down(key: &str, code: &str, ctrl: bool, meta: bool) -> Option<KeyIntent> {
        if code == "KeyA" && (ctrl || meta) {
            return Some(KeyIntent::Hide);
        }
        CARET_KEYS.contains(&key).then_some(KeyIntent::Hide)
    }

    /// Classify a `keyup`.
    pub fn key_up(key: &str) -> Option<KeyIntent> {
        (key == "Shift").then_some(KeyIntent::Resolve)
    }
}
