//! Wire protocol.
//!
//! Frames talk to each other with `postMessage(.., "*")` and to the
//! background worker with `runtime.sendMessage`. Payloads are plain JSON
//! objects tagged by `action`:
//!
//! ```json
//! { "action": "show", "selectedString": "…", "selectionDirection": "forward",
//!   "onOneLine": true, "selectionEnd": { "left": 0, "top": 0, "right": 0, "bottom": 0 } }
//! { "action": "hide" }
//! { "action": "search", "selectedString": "…" }
//! ```

use crate::geom::{FrameOffset, Rect};
use crate::model::{Direction, SelectionSnapshot};
use serde::{Deserialize, Serialize};

// ─── Cross-frame messages ────────────────────────────────────────────────

/// A show/hide request travelling up the frame tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum FrameMessage {
    Show(ShowRequest),
    Hide,
}

/// Payload of a `show` message. `selection_end` is in the coordinate
/// space of whichever frame currently holds the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub selected_string: String,
    pub selection_direction: Direction,
    pub on_one_line: bool,
    pub selection_end: Rect,
}

impl ShowRequest {
    /// Re-express the request in the parent frame's viewport.
    #[must_use]
    pub fn translated(&self, offset: FrameOffset) -> Self {
        Self {
            selection_end: offset.apply(&self.selection_end),
            ..self.clone()
        }
    }
}

impl From<SelectionSnapshot> for ShowRequest {
    fn from(snapshot: SelectionSnapshot) -> Self {
        Self {
            selected_string: snapshot.text,
            selection_direction: snapshot.direction,
            on_one_line: snapshot.on_one_line,
            selection_end: snapshot.end_rect,
        }
    }
}

impl FrameMessage {
    pub fn show(snapshot: SelectionSnapshot) -> Self {
        Self::Show(snapshot.into())
    }

    /// Decode a message posted by another frame.
    ///
    /// Pages use `postMessage` for their own purposes too, so anything that
    /// is not one of ours decodes to `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(message) => Some(message),
            Err(e) => {
                log::trace!("ignoring foreign message: {e}");
                None
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"action":"hide"}"#.to_string())
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Show(_) => "show",
            Self::Hide => "hide",
        }
    }
}

// ─── Background requests ─────────────────────────────────────────────────

/// A request from a content script to the background worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RuntimeMessage {
    #[serde(rename_all = "camelCase")]
    Search { selected_string: String },
}

impl RuntimeMessage {
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
