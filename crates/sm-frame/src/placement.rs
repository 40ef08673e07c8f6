//! Popup placement.
//!
//! Positions the menu next to the selection's trailing edge: above or below
//! it, horizontally centered on it, clamped to the viewport, with the arrow
//! indicator still pointing at the edge.

use sm_core::theme::{ARROW_HEIGHT, ARROW_WIDTH};
use sm_core::{Direction, Rect, ShowRequest, Viewport};

/// Rendered size of the menu (`offsetWidth/Height`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuSize {
    pub width: f64,
    pub height: f64,
}

/// Which side of the selection edge the menu sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

/// Computed position of the menu and its arrow, in viewport px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub side: Side,
    pub left: f64,
    pub top: f64,
    /// Arrow x inside the menu.
    pub arrow_left: f64,
    /// Top of the border-triangle arrow inside the menu.
    pub arrow_top: f64,
    /// Center y of the rotated-square arrow inside the menu.
    pub arrow_center_top: f64,
}

impl Placement {
    /// Custom properties the stylesheet reads the arrow from.
    pub fn arrow_properties(&self) -> [(&'static str, String); 4] {
        let arrow = match self.side {
            Side::Above => "var(--arrow-down)",
            Side::Below => "var(--arrow-up)",
        };
        [
            ("--arrow", arrow.to_string()),
            ("--arrow-top", format!("{}px", self.arrow_top)),
            ("--arrow-left", format!("{}px", self.arrow_left)),
            ("--arrow-center-top", format!("{}px", self.arrow_center_top)),
        ]
    }
}

/// Place the menu for a show request.
pub fn place_menu(request: &ShowRequest, menu: MenuSize, viewport: Viewport) -> Placement {
    let end = request.selection_end;
    let side = vertical_side(
        &end,
        request.on_one_line,
        request.selection_direction,
        menu.height,
        viewport.height,
    );

    let top = match side {
        Side::Above => viewport.height.min(end.top) - ARROW_HEIGHT - menu.height,
        Side::Below => end.bottom + ARROW_HEIGHT,
    };
    let (left, arrow_left) = horizontal(end.left, menu.width, viewport.width);
    let (arrow_top, arrow_center_top) = match side {
        Side::Above => (menu.height, menu.height),
        Side::Below => (-ARROW_HEIGHT * 2.0, 0.0),
    };

    Placement {
        side,
        left,
        top,
        arrow_left,
        arrow_top,
        arrow_center_top,
    }
}

fn vertical_side(
    end: &Rect,
    on_one_line: bool,
    direction: Direction,
    menu_height: f64,
    viewport_height: f64,
) -> Side {
    let mut side = if on_one_line || direction.is_backward() {
        Side::Above
    } else {
        Side::Below
    };
    if end.top - ARROW_HEIGHT - menu_height < 0.0 {
        side = Side::Below;
    }
    // Checked last: running off the bottom outranks running off the top.
    if end.bottom + ARROW_HEIGHT + menu_height > viewport_height {
        side = Side::Above;
    }
    side
}

/// `(menu left, arrow left inside the menu)`.
fn horizontal(anchor: f64, menu_width: f64, viewport_width: f64) -> (f64, f64) {
    let half = menu_width / 2.0;
    if anchor + half > viewport_width {
        let arrow = (menu_width - (viewport_width - anchor)).min(menu_width - ARROW_WIDTH / 2.0);
        (viewport_width - menu_width, arrow)
    } else if anchor < half {
        (0.0, anchor.max(ARROW_WIDTH / 2.0))
    } else {
        (anchor - half, half)
    }
}
