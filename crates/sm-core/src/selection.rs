//! Selection geometry resolution.
//!
//! Turns either a document selection or a text-control selection into a
//! `SelectionSnapshot`: the selected text, the drag direction, whether the
//! selection sits on one line, and the viewport rectangle of the edge the
//! user dragged toward. Returns `None` for anything that should not show a
//! menu (collapsed, whitespace-only, or empty after trimming).

use crate::geom::Rect;
use crate::mirror::{
    ComputedStyle, ControlKind, EngineQuirks, MirrorGuard, MirrorHost, MirrorPlan, MountedMirror,
};
use crate::model::{Direction, SelectionSnapshot};
use crate::text::{utf16_len, utf16_slice};
use crate::tree::{
    BoundaryPoint, DomRange, DomTree, common_ancestor, node_after_boundary, node_before_boundary,
    nodes_between, range_text,
};
use smallvec::SmallVec;

/// A document tree that can also measure caret positions.
pub trait CaretGeometry: DomTree {
    /// Bounding rect of a range collapsed at `point`, in viewport space.
    /// `None` if the point could not be measured.
    fn caret_rect(&self, point: &BoundaryPoint<Self::Node>) -> Option<Rect>;
}

/// A snapshot of `window.getSelection()`.
#[derive(Debug, Clone)]
pub struct DomSelection<N> {
    pub anchor: BoundaryPoint<N>,
    /// `getRangeAt(0..rangeCount)`; more than one only in engines that
    /// support multi-range (table/box) selection.
    pub ranges: SmallVec<[DomRange<N>; 1]>,
    pub is_collapsed: bool,
    /// `Selection.toString()`.
    pub text: String,
}

/// A snapshot of an `<input>` / `<textarea>` and its selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSelection {
    pub kind: ControlKind,
    pub value: String,
    /// UTF-16 offsets, `start <= end`.
    pub selection_start: u32,
    pub selection_end: u32,
    pub direction: Direction,
    /// Border-box rect of the control.
    pub bounds: Rect,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl ControlSelection {
    pub fn selected_text(&self) -> String {
        utf16_slice(&self.value, self.selection_start, self.selection_end)
    }
}

// ─── Document selections ─────────────────────────────────────────────────

/// Resolve a document selection.
pub fn resolve_selection<H: CaretGeometry>(
    host: &H,
    selection: &DomSelection<H::Node>,
) -> Option<SelectionSnapshot> {
    if selection.is_collapsed || selection.ranges.is_empty() {
        log::trace!("selection collapsed; nothing to resolve");
        return None;
    }

    let hugged: SmallVec<[DomRange<H::Node>; 1]> = selection
        .ranges
        .iter()
        .filter_map(|range| hug_text(host, range))
        .collect();
    if hugged.is_empty() {
        log::trace!("selection holds no visible text");
        return None;
    }

    let direction = selection_direction(selection);
    let anchor_range = match direction {
        Direction::Forward => hugged.last(),
        Direction::Backward => hugged.first(),
    }?;
    let Some((start, end)) = edge_rects(host, anchor_range, direction) else {
        log::warn!("selection edges could not be measured");
        return None;
    };

    let mut text = selection.text.clone();
    if text.is_empty() {
        // Some engines stringify multi-range selections as "".
        text = selection
            .ranges
            .iter()
            .map(|range| range_text(host, range))
            .collect::<Vec<_>>()
            .join(" ");
    }

    let snapshot = SelectionSnapshot::from_edges(text, direction, start, end);
    log::debug!(
        "resolved selection: {} chars, {:?}, one_line={}, end={:?}",
        snapshot.text.chars().count(),
        snapshot.direction,
        snapshot.on_one_line,
        snapshot.end_rect
    );
    Some(snapshot)
}

/// Forward if the last range starts at the anchor, backward otherwise.
pub fn selection_direction<N: PartialEq>(selection: &DomSelection<N>) -> Direction {
    match selection.ranges.last() {
        Some(last) if last.start == selection.anchor => Direction::Forward,
        Some(_) => Direction::Backward,
        None => Direction::Forward,
    }
}

/// Shrink a range so both ends sit in text nodes with visible content.
///
/// Leading/trailing element boundaries and whitespace-only text nodes are
/// dropped. Returns `None` if nothing visible remains.
pub fn hug_text<T: DomTree>(tree: &T, range: &DomRange<T::Node>) -> Option<DomRange<T::Node>> {
    if range.is_collapsed() {
        return None;
    }
    let root = common_ancestor(tree, range);
    if let Some(data) = tree.text_data(&root) {
        let selected = utf16_slice(&data, range.start.offset, range.end.offset);
        return (!selected.trim().is_empty()).then(|| range.clone());
    }

    let first = node_after_boundary(tree, &range.start, &root)?;
    let last = node_before_boundary(tree, &range.end, &root)?;
    let nodes = nodes_between(tree, &first, &last, &root)?;

    let mut visible = nodes.into_iter().filter_map(|node| {
        let data = tree.text_data(&node)?;
        (!data.trim().is_empty()).then_some((node, data))
    });
    let (first_text, first_data) = visible.next()?;
    let (last_text, last_data) = visible.last().unwrap_or((first_text.clone(), first_data));

    let start = if first_text == range.start.node {
        range.start.clone()
    } else {
        BoundaryPoint::new(first_text, 0)
    };
    let end = if last_text == range.end.node {
        range.end.clone()
    } else {
        let len = utf16_len(&last_data);
        BoundaryPoint::new(last_text, len)
    };
    Some(DomRange::new(start, end))
}

/// Collapsed rects at the range's (start, end), swapped when backward so
/// `end` is always the edge the user dragged toward.
fn edge_rects<H: CaretGeometry>(
    host: &H,
    range: &DomRange<H::Node>,
    direction: Direction,
) -> Option<(Rect, Rect)> {
    let at_start = host.caret_rect(&range.start)?;
    let at_end = host.caret_rect(&range.end)?;
    Some(match direction {
        Direction::Forward => (at_start, at_end),
        Direction::Backward => (at_end, at_start),
    })
}

// ─── Text controls ───────────────────────────────────────────────────────

/// Resolve the selection inside an `<input>` or `<textarea>` by measuring
/// a temporary mirror element.
///
/// The mirror is mounted and removed within this call.
pub fn resolve_control<H: MirrorHost>(
    host: &H,
    control: &ControlSelection,
    style: &impl ComputedStyle,
    quirks: EngineQuirks,
) -> Option<SelectionSnapshot> {
    let text = control.selected_text();
    if text.trim().is_empty() {
        log::trace!("control selection is blank");
        return None;
    }

    let plan = MirrorPlan::build(
        control.kind,
        &control.value,
        style,
        control.bounds,
        (control.scroll_left, control.scroll_top),
        quirks,
    );

    let (start, end) = {
        let mirror = match host.mount(&plan) {
            Ok(mirror) => MirrorGuard::new(mirror),
            Err(e) => {
                log::warn!("{e}");
                return None;
            }
        };
        let measured = mirror
            .caret_rect(control.selection_start)
            .zip(mirror.caret_rect(control.selection_end));
        let Some((at_start, at_end)) = measured else {
            log::warn!("mirror carets could not be measured");
            return None;
        };
        let (start, end) = match control.direction {
            Direction::Forward => (at_start, at_end),
            Direction::Backward => (at_end, at_start),
        };
        let border = plan.text_border(&mirror.client_box());
        (start, border.clamp(end))
    };

    let snapshot = SelectionSnapshot::from_edges(text, control.direction, start, end);
    log::debug!(
        "resolved {:?} selection: one_line={}, end={:?}",
        control.kind,
        snapshot.on_one_line,
        snapshot.end_rect
    );
    Some(snapshot)
}
