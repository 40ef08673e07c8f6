//! The live document as a `DomTree`, and snapshots of `getSelection()`.

use crate::error::HostResult;
use sm_core::{BoundaryPoint, CaretGeometry, DomRange, DomSelection, DomTree, Rect};
use smallvec::SmallVec;
use web_sys::{Document, DomRect, Node, Window};

pub(crate) fn to_rect(rect: &DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
}

/// Document tree of one frame, measured with collapsed `Range`s.
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl DomTree for WebDom {
    type Node = Node;

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn first_child(&self, node: &Node) -> Option<Node> {
        node.first_child()
    }

    fn last_child(&self, node: &Node) -> Option<Node> {
        node.last_child()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn previous_sibling(&self, node: &Node) -> Option<Node> {
        node.previous_sibling()
    }

    fn text_data(&self, node: &Node) -> Option<String> {
        if node.node_type() == Node::TEXT_NODE {
            node.node_value()
        } else {
            None
        }
    }
}

impl CaretGeometry for WebDom {
    fn caret_rect(&self, point: &BoundaryPoint<Node>) -> Option<Rect> {
        let measure = || -> HostResult<Rect> {
            let range = self.document.create_range()?;
            range.set_start(&point.node, point.offset)?;
            range.collapse_with_to_start(true);
            Ok(to_rect(&range.get_bounding_client_rect()))
        };
        match measure() {
            Ok(rect) => rect.measured_caret(),
            Err(e) => {
                log::warn!("caret measurement failed at {point:?}: {e}");
                None
            }
        }
    }
}

/// Snapshot the frame's selection. `None` if there is no selection object.
pub fn read_selection(window: &Window) -> HostResult<Option<DomSelection<Node>>> {
    let Some(selection) = window.get_selection()? else {
        return Ok(None);
    };
    let Some(anchor_node) = selection.anchor_node() else {
        return Ok(None);
    };

    let mut ranges = SmallVec::new();
    for i in 0..selection.range_count() {
        let range = selection.get_range_at(i)?;
        ranges.push(DomRange::new(
            BoundaryPoint::new(range.start_container()?, range.start_offset()?),
            BoundaryPoint::new(range.end_container()?, range.end_offset()?),
        ));
    }

    Ok(Some(DomSelection {
        anchor: BoundaryPoint::new(anchor_node, selection.anchor_offset()),
        ranges,
        is_collapsed: selection.is_collapsed(),
        text: String::from(selection.to_string()),
    }))
}
