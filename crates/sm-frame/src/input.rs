//! Input abstraction layer.
//!
//! Normalizes the window-level DOM events the router listens to into a
//! single `InputEvent` enum. `T` is whatever the host uses to refer to an
//! event target (a `web_sys::Element` in the browser, a plain id in tests).

/// `MouseEvent.button` of the primary (usually left) button.
pub const PRIMARY_BUTTON: i16 = 0;

/// A normalized window-level input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent<T> {
    /// Any mouse button pressed.
    MouseDown { button: i16 },

    /// Mouse button released over `target`.
    MouseUp { button: i16, target: T },

    /// Scroll anywhere in the frame (captured, so nested scrollers count).
    Scroll,

    /// Key pressed.
    KeyDown {
        /// `KeyboardEvent.key`, e.g. `"ArrowLeft"`.
        key: String,
        /// `KeyboardEvent.code`, e.g. `"KeyA"`.
        code: String,
        ctrl: bool,
        meta: bool,
    },

    /// Key released while `target` had focus.
    KeyUp { key: String, target: T },

    /// Window resized.
    Resize,

    /// Text content of an editable element changed.
    TextInput,
}

impl<T> InputEvent<T> {
    pub fn mouse_down(button: i16) -> Self {
        Self::MouseDown { button }
    }

    pub fn mouse_up(button: i16, target: T) -> Self {
        Self::MouseUp { button, target }
    }

    pub fn key_down(key: impl Into<String>, code: impl Into<String>, ctrl: bool, meta: bool) -> Self {
        Self::KeyDown {
            key: key.into(),
            code: code.into(),
            ctrl,
            meta,
        }
    }

    pub fn key_up(key: impl Into<String>, target: T) -> Self {
        Self::KeyUp {
            key: key.into(),
            target,
        }
    }

    /// DOM event type this was normalized from.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MouseDown { .. } => "mousedown",
            Self::MouseUp { .. } => "mouseup",
            Self::Scroll => "scroll",
            Self::KeyDown { .. } => "keydown",
            Self::KeyUp { .. } => "keyup",
            Self::Resize => "resize",
            Self::TextInput => "input",
        }
    }

    pub fn is_primary_button(&self) -> bool {
        matches!(
            self,
            Self::MouseDown { button: PRIMARY_BUTTON } | Self::MouseUp { button: PRIMARY_BUTTON, .. }
        )
    }
}
