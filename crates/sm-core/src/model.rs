//! Core data model: selection snapshots, direction, and the menu's
//! configuration mirror.

use crate::geom::Rect;
use serde::{Deserialize, Serialize};

// ─── Direction ───────────────────────────────────────────────────────────

/// Which way the user dragged, relative to DOM order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Parse a DOM `selectionDirection` value. `"none"` (and anything
    /// unrecognized) counts as forward.
    pub fn from_dom(value: &str) -> Self {
        match value {
            "backward" => Self::Backward,
            _ => Self::Forward,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }

    pub fn is_backward(&self) -> bool {
        matches!(self, Self::Backward)
    }
}

// ─── Selection snapshot ──────────────────────────────────────────────────

/// Immutable record of one qualifying selection: what is selected, which
/// way it was dragged, and where its trailing edge sits in the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub text: String,
    pub direction: Direction,
    pub on_one_line: bool,
    /// Zero-width rectangle at the edge the user dragged toward.
    pub end_rect: Rect,
}

impl SelectionSnapshot {
    /// Build a snapshot from the two collapsed edge rectangles.
    ///
    /// `start` and `end` are already swapped for direction: `end` is the
    /// edge toward which the user dragged.
    pub fn from_edges(text: String, direction: Direction, start: Rect, end: Rect) -> Self {
        Self {
            text,
            direction,
            on_one_line: start.top == end.top,
            end_rect: end,
        }
    }
}

// ─── Menu visibility ─────────────────────────────────────────────────────

/// Visibility state of the top-frame popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

// ─── Menu configuration ──────────────────────────────────────────────────

/// Presentation settings mirrored from the settings store.
///
/// Every field is always populated; see `settings::StoredOptions` for the
/// defaults that fill an empty store.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfiguration {
    pub font_family: String,
    pub search_button_label: String,
    pub copy_button_label: String,
    pub dark_theme: bool,
}

impl Default for MenuConfiguration {
    fn default() -> Self {
        Self {
            font_family: crate::settings::DEFAULT_FONT_FAMILY.to_string(),
            search_button_label: crate::settings::DEFAULT_SEARCH_BUTTON_TEXT.to_string(),
            copy_button_label: crate::settings::DEFAULT_COPY_BUTTON_TEXT.to_string(),
            dark_theme: false,
        }
    }
}
