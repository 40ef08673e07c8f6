//! Mirror projection for plain-text form controls.
//!
//! `<input>` and `<textarea>` expose selection offsets but no way to measure
//! where those offsets are drawn. The projector describes an invisible,
//! fixed-position `<div>` that reproduces the control's box and typography
//! exactly, so a range over the div's single text node lands on the same
//! pixels as the control's own glyphs.
//!
//! The plan is pure data. A `MirrorHost` materializes it, measures, and the
//! `MirrorGuard` removes it again before the resolve call returns.

use crate::css::{format_px, px_or_zero};
use crate::geom::Rect;
use std::collections::HashMap;
use thiserror::Error;

/// Every computed property that affects the layout of the control's text.
pub const MIRRORED_PROPERTIES: &[&str] = &[
    "box-sizing",
    "width",
    "height",
    // Borders
    "border-left-width",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-style",
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    // Padding
    "padding-left",
    "padding-top",
    "padding-right",
    "padding-bottom",
    // Font shorthand longhands
    "font-style",
    "font-variant",
    "font-weight",
    "font-stretch",
    "font-size",
    "line-height",
    "font-family",
    // Text flow
    "text-align",
    "text-transform",
    "text-indent",
    "white-space",
    "letter-spacing",
    "word-spacing",
    "overflow-x",
    "overflow-y",
    "overflow-wrap",
];

/// Which kind of plain-text control is being mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Single-line `<input>`.
    Input,
    /// Multi-line `<textarea>`.
    TextArea,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MirrorError {
    #[error("failed to mount mirror element: {0}")]
    Mount(String),
}

// ─── Computed style access ───────────────────────────────────────────────

/// Read access to a control's computed style (kebab-case property names).
pub trait ComputedStyle {
    /// The computed value, or an empty string if the property is unknown.
    fn property(&self, name: &str) -> String;
}

impl ComputedStyle for HashMap<&str, &str> {
    fn property(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }
}

impl ComputedStyle for HashMap<String, String> {
    fn property(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

// ─── Engine quirks ───────────────────────────────────────────────────────

/// Layout differences between rendering engines that the mirror must
/// compensate for.
///
/// Derived from a feature probe rather than the user agent, so an
/// unrecognized engine falls back to the most common behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineQuirks {
    /// Textareas honour `overflow: visible`, and their scrollbars take up
    /// room inside the box. The mirror keeps scrollbars (`auto`) so that
    /// wrapping width matches.
    pub textarea_scrollbars_in_layout: bool,
    /// Trailing (right/bottom) textarea padding is part of the visible text
    /// area. When false, the right padding strip is excluded instead.
    pub textarea_trailing_padding_visible: bool,
}

impl Default for EngineQuirks {
    fn default() -> Self {
        Self::probe("auto")
    }
}

impl EngineQuirks {
    /// Build the quirk table from the computed default `overflow-x` of a
    /// freshly created `<textarea>`.
    pub fn probe(default_textarea_overflow: &str) -> Self {
        let honours_visible = default_textarea_overflow.trim() == "visible";
        Self {
            textarea_scrollbars_in_layout: honours_visible,
            textarea_trailing_padding_visible: !honours_visible,
        }
    }
}

// ─── Mirror plan ─────────────────────────────────────────────────────────

/// Everything a host needs to build, position, and scroll the mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorPlan {
    pub kind: ControlKind,
    /// Full control value; becomes the mirror's only text node.
    pub text: String,
    /// Inline style declarations, applied in order.
    pub declarations: Vec<(&'static str, String)>,
    /// Control scroll offsets, applied after the mirror is attached.
    pub scroll_left: f64,
    pub scroll_top: f64,
    /// Control border-box origin in the viewport.
    pub origin_left: f64,
    pub origin_top: f64,
    padding_right: f64,
    padding_bottom: f64,
    quirks: EngineQuirks,
}

impl MirrorPlan {
    /// Project a control into a mirror description.
    pub fn build(
        kind: ControlKind,
        text: &str,
        style: &impl ComputedStyle,
        bounds: Rect,
        scroll: (f64, f64),
        quirks: EngineQuirks,
    ) -> Self {
        let mut declarations: Vec<(&'static str, String)> = MIRRORED_PROPERTIES
            .iter()
            .map(|name| (*name, style.property(name)))
            .collect();

        let padding_right = px_or_zero(&style.property("padding-right"));
        let padding_bottom = px_or_zero(&style.property("padding-bottom"));

        set(&mut declarations, "visibility", "hidden".to_string());
        set(&mut declarations, "position", "fixed".to_string());
        set(&mut declarations, "left", format_px(bounds.left));
        set(&mut declarations, "top", format_px(bounds.top));
        set(&mut declarations, "margin", "0".to_string());

        match kind {
            ControlKind::TextArea => {
                for axis in ["overflow-x", "overflow-y"] {
                    if style.property(axis) == "visible" {
                        set(&mut declarations, axis, "auto".to_string());
                    }
                    if !quirks.textarea_scrollbars_in_layout {
                        set(&mut declarations, axis, "hidden".to_string());
                    }
                }
                // A div with an explicit height lets its content run into
                // the bottom padding; a textarea does not.
                let height = px_or_zero(&style.property("height")) - padding_bottom;
                set(&mut declarations, "height", format_px(height));
            }
            ControlKind::Input => {
                set(&mut declarations, "white-space", "pre".to_string());
                set(&mut declarations, "overflow-x", "hidden".to_string());
                set(&mut declarations, "overflow-y", "hidden".to_string());
                // Same for the right padding of a single-line control.
                let width = px_or_zero(&style.property("width")) - padding_right;
                set(&mut declarations, "width", format_px(width));
            }
        }

        Self {
            kind,
            text: text.to_string(),
            declarations,
            scroll_left: scroll.0,
            scroll_top: scroll.1,
            origin_left: bounds.left,
            origin_top: bounds.top,
            padding_right,
            padding_bottom,
            quirks,
        }
    }

    /// Look up a declaration by property name.
    pub fn declaration(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The visible edges of the control's text area, given the mounted
    /// mirror's client box.
    pub fn text_border(&self, client: &ClientBox) -> TextBorder {
        let right = self.origin_left + client.left + client.width;
        match self.kind {
            ControlKind::Input => TextBorder {
                right,
                bottom: None,
            },
            ControlKind::TextArea => {
                let bottom = self.origin_top + client.top + client.height;
                if self.quirks.textarea_trailing_padding_visible {
                    TextBorder {
                        right,
                        bottom: Some(bottom + self.padding_bottom),
                    }
                } else {
                    TextBorder {
                        right: right - self.padding_right,
                        bottom: Some(bottom),
                    }
                }
            }
        }
    }
}

fn set(declarations: &mut Vec<(&'static str, String)>, name: &'static str, value: String) {
    match declarations.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => declarations.push((name, value)),
    }
}

// ─── Measurement ─────────────────────────────────────────────────────────

/// `clientLeft/Top/Width/Height` of the mounted mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Furthest visible text coordinates inside a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBorder {
    pub right: f64,
    /// Only multi-line controls clip vertically.
    pub bottom: Option<f64>,
}

impl TextBorder {
    /// Pull a trailing-edge rectangle back inside the visible text area.
    ///
    /// The rectangle collapses to zero width at the clamped x.
    pub fn clamp(&self, end: Rect) -> Rect {
        let x = end.right.min(self.right);
        let bottom = match self.bottom {
            Some(limit) => end.bottom.min(limit),
            None => end.bottom,
        };
        Rect {
            left: x,
            top: end.top,
            right: x,
            bottom,
        }
    }
}

/// Creates mirror elements in a live document.
pub trait MirrorHost {
    type Mirror: MountedMirror;

    /// Attach a mirror built from `plan` and apply its scroll offsets.
    fn mount(&self, plan: &MirrorPlan) -> Result<Self::Mirror, MirrorError>;
}

/// A mirror element currently attached to the document.
pub trait MountedMirror {
    /// Bounding rect of a collapsed range at `offset` in the mirror's text,
    /// or `None` if it could not be measured.
    fn caret_rect(&self, offset: u32) -> Option<Rect>;
    fn client_box(&self) -> ClientBox;
    /// Detach the element. Called exactly once.
    fn unmount(&mut self);
}

/// Scope guard that detaches the mirror when dropped.
pub struct MirrorGuard<M: MountedMirror> {
    mirror: M,
}

impl<M: MountedMirror> MirrorGuard<M> {
    pub fn new(mirror: M) -> Self {
        Self { mirror }
    }
}

impl<M: MountedMirror> std::ops::Deref for MirrorGuard<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.mirror
    }
}

impl<M: MountedMirror> Drop for MirrorGuard<M> {
    fn drop(&mut self) {
        self.mirror.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn textarea_style() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("box-sizing", "content-box"),
            ("width", "300px"),
            ("height", "120px"),
            ("padding-right", "4px"),
            ("padding-bottom", "6px"),
            ("overflow-x", "visible"),
            ("overflow-y", "visible"),
            ("font-family", "monospace"),
            ("white-space", "pre-wrap"),
        ])
    }

    fn input_style() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("width", "200px"),
            ("height", "20px"),
            ("padding-right", "5px"),
            ("white-space", "normal"),
            ("overflow-x", "clip"),
        ])
    }

    #[test]
    fn probe_maps_visible_overflow_to_scrollbar_quirk() {
        let gecko_like = EngineQuirks::probe("visible");
        assert!(gecko_like.textarea_scrollbars_in_layout);
        assert!(!gecko_like.textarea_trailing_padding_visible);

        let blink_like = EngineQuirks::probe("auto");
        assert!(!blink_like.textarea_scrollbars_in_layout);
        assert!(blink_like.textarea_trailing_padding_visible);
        assert_eq!(EngineQuirks::default(), blink_like);
    }

    #[test]
    fn plan_copies_every_mirrored_property() {
        let style = textarea_style();
        let plan = MirrorPlan::build(
            ControlKind::TextArea,
            "abc",
            &style,
            Rect::new(10.0, 20.0, 318.0, 152.0),
            (0.0, 15.0),
            EngineQuirks::probe("visible"),
        );
        for name in MIRRORED_PROPERTIES {
            assert!(plan.declaration(name).is_some(), "missing {name}");
        }
        assert_eq!(plan.declaration("font-family"), Some("monospace"));
        assert_eq!(plan.declaration("visibility"), Some("hidden"));
        assert_eq!(plan.declaration("position"), Some("fixed"));
        assert_eq!(plan.declaration("left"), Some("10px"));
        assert_eq!(plan.declaration("top"), Some("20px"));
        assert_eq!(plan.scroll_top, 15.0);
        assert_eq!(plan.text, "abc");
    }

    #[test]
    fn textarea_overflow_normalized_per_engine() {
        let style = textarea_style();
        let bounds = Rect::new(0.0, 0.0, 308.0, 132.0);

        let gecko = MirrorPlan::build(
            ControlKind::TextArea,
            "",
            &style,
            bounds,
            (0.0, 0.0),
            EngineQuirks::probe("visible"),
        );
        assert_eq!(gecko.declaration("overflow-x"), Some("auto"));
        assert_eq!(gecko.declaration("overflow-y"), Some("auto"));

        let blink = MirrorPlan::build(
            ControlKind::TextArea,
            "",
            &style,
            bounds,
            (0.0, 0.0),
            EngineQuirks::probe("auto"),
        );
        assert_eq!(blink.declaration("overflow-x"), Some("hidden"));
        assert_eq!(blink.declaration("overflow-y"), Some("hidden"));
    }

    #[test]
    fn textarea_height_excludes_bottom_padding() {
        let plan = MirrorPlan::build(
            ControlKind::TextArea,
            "",
            &textarea_style(),
            Rect::default(),
            (0.0, 0.0),
            EngineQuirks::default(),
        );
        assert_eq!(plan.declaration("height"), Some("114px"));
        assert_eq!(plan.declaration("width"), Some("300px"));
    }

    #[test]
    fn input_forces_single_line_layout() {
        let plan = MirrorPlan::build(
            ControlKind::Input,
            "",
            &input_style(),
            Rect::default(),
            (0.0, 0.0),
            EngineQuirks::default(),
        );
        assert_eq!(plan.declaration("white-space"), Some("pre"));
        assert_eq!(plan.declaration("overflow-x"), Some("hidden"));
        assert_eq!(plan.declaration("overflow-y"), Some("hidden"));
        assert_eq!(plan.declaration("width"), Some("195px"));
        assert_eq!(plan.declaration("height"), Some("20px"));
    }

    #[test]
    fn input_border_is_client_box_right_edge() {
        let plan = MirrorPlan::build(
            ControlKind::Input,
            "",
            &input_style(),
            Rect::new(100.0, 50.0, 307.0, 74.0),
            (0.0, 0.0),
            EngineQuirks::default(),
        );
        let client = ClientBox {
            left: 1.0,
            top: 1.0,
            width: 200.0,
            height: 22.0,
        };
        let border = plan.text_border(&client);
        assert_eq!(border, TextBorder { right: 301.0, bottom: None });
    }

    #[test]
    fn textarea_border_depends_on_padding_quirk() {
        let client = ClientBox {
            left: 1.0,
            top: 1.0,
            width: 304.0,
            height: 120.0,
        };
        let bounds = Rect::new(0.0, 0.0, 306.0, 134.0);

        let blink = MirrorPlan::build(
            ControlKind::TextArea,
            "",
            &textarea_style(),
            bounds,
            (0.0, 0.0),
            EngineQuirks::probe("auto"),
        );
        assert_eq!(
            blink.text_border(&client),
            TextBorder {
                right: 305.0,
                bottom: Some(127.0)
            }
        );

        let gecko = MirrorPlan::build(
            ControlKind::TextArea,
            "",
            &textarea_style(),
            bounds,
            (0.0, 0.0),
            EngineQuirks::probe("visible"),
        );
        assert_eq!(
            gecko.text_border(&client),
            TextBorder {
                right: 301.0,
                bottom: Some(121.0)
            }
        );
    }

    #[test]
    fn clamp_never_exceeds_visible_edge() {
        let border = TextBorder {
            right: 250.0,
            bottom: None,
        };
        let past_edge = Rect::new(412.0, 10.0, 412.0, 28.0);
        let clamped = border.clamp(past_edge);
        assert_eq!(clamped, Rect::new(250.0, 10.0, 250.0, 28.0));

        let inside = Rect::new(120.0, 10.0, 120.0, 28.0);
        assert_eq!(border.clamp(inside), inside);
    }

    #[test]
    fn clamp_limits_bottom_for_multiline() {
        let border = TextBorder {
            right: 300.0,
            bottom: Some(90.0),
        };
        let below = Rect::new(40.0, 95.0, 40.0, 113.0);
        let clamped = border.clamp(below);
        assert_eq!(clamped.bottom, 90.0);
        assert_eq!(clamped.top, 95.0);
        assert_eq!(clamped.left, 40.0);
    }
}
