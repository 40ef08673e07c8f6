//! Viewport-space geometry.
//!
//! Every coordinate is in CSS pixels relative to the viewport of the frame
//! that currently holds the value. Crossing a frame boundary is an explicit
//! `translate`.

use serde::{Deserialize, Serialize};

/// The visible area of a frame (`documentElement.clientWidth/Height`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// An edge-based rectangle, as reported by `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Shift every edge by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// True if every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// Accept a collapsed-range rect read back from layout.
    ///
    /// A caret on rendered text always spans a line box. Nodes that are not
    /// rendered report an all-zero rect, which is rejected along with
    /// non-finite coordinates.
    pub fn measured_caret(self) -> Option<Self> {
        (self.is_finite() && self.height() > 0.0).then_some(self)
    }
}

/// Offset of a child frame's content origin inside its parent's viewport.
///
/// `border-box origin + client (border) inset + padding`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOffset {
    pub left: f64,
    pub top: f64,
}

impl FrameOffset {
    /// Compute the content origin of an `<iframe>` from its box metrics.
    pub fn from_iframe_box(
        bounds: Rect,
        client_left: f64,
        client_top: f64,
        padding_left: f64,
        padding_top: f64,
    ) -> Self {
        Self {
            left: bounds.left + client_left + padding_left,
            top: bounds.top + client_top + padding_top,
        }
    }

    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translate(self.left, self.top)
    }
}
