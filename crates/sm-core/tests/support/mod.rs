//! In-memory stand-ins for the browser: an arena DOM with a monospace
//! "layout", and a mirror host that records mount/unmount.

#![allow(dead_code)]

use sm_core::mirror::{ClientBox, MirrorError, MirrorHost, MirrorPlan, MountedMirror};
use sm_core::selection::CaretGeometry;
use sm_core::tree::{BoundaryPoint, DomTree};
use sm_core::Rect;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const CHAR_W: f64 = 8.0;
pub const LINE_H: f64 = 20.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ─── Arena DOM ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef(pub usize);

struct NodeData {
    parent: Option<usize>,
    children: Vec<usize>,
    text: Option<String>,
    /// (line, column) of the first character, for text nodes.
    position: (u32, u32),
}

pub struct ArenaDom {
    nodes: Vec<NodeData>,
    pub measured: RefCell<Vec<BoundaryPoint<NodeRef>>>,
    /// Text nodes that are not rendered; carets inside them measure as `None`.
    pub hidden: Vec<NodeRef>,
}

impl ArenaDom {
    pub fn new() -> (Self, NodeRef) {
        let dom = Self {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                text: None,
                position: (0, 0),
            }],
            measured: RefCell::new(Vec::new()),
            hidden: Vec::new(),
        };
        (dom, NodeRef(0))
    }

    pub fn element(&mut self, parent: NodeRef) -> NodeRef {
        self.push(parent, None, (0, 0))
    }

    /// Append a text node laid out at `(line, column)`.
    pub fn text(&mut self, parent: NodeRef, data: &str, line: u32, column: u32) -> NodeRef {
        self.push(parent, Some(data.to_string()), (line, column))
    }

    fn push(&mut self, parent: NodeRef, text: Option<String>, position: (u32, u32)) -> NodeRef {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            parent: Some(parent.0),
            children: Vec::new(),
            text,
            position,
        });
        self.nodes[parent.0].children.push(id);
        NodeRef(id)
    }

    fn siblings(&self, node: &NodeRef) -> Option<(&[usize], usize)> {
        let parent = self.nodes[node.0].parent?;
        let children = &self.nodes[parent].children;
        let index = children.iter().position(|c| *c == node.0)?;
        Some((children, index))
    }

    fn first_text_in(&self, node: NodeRef) -> Option<NodeRef> {
        if self.nodes[node.0].text.is_some() {
            return Some(node);
        }
        self.nodes[node.0]
            .children
            .iter()
            .find_map(|c| self.first_text_in(NodeRef(*c)))
    }
}

impl DomTree for ArenaDom {
    type Node = NodeRef;

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        self.nodes[node.0].parent.map(NodeRef)
    }

    fn first_child(&self, node: &NodeRef) -> Option<NodeRef> {
        self.nodes[node.0].children.first().copied().map(NodeRef)
    }

    fn last_child(&self, node: &NodeRef) -> Option<NodeRef> {
        self.nodes[node.0].children.last().copied().map(NodeRef)
    }

    fn next_sibling(&self, node: &NodeRef) -> Option<NodeRef> {
        let (siblings, index) = self.siblings(node)?;
        siblings.get(index + 1).copied().map(NodeRef)
    }

    fn previous_sibling(&self, node: &NodeRef) -> Option<NodeRef> {
        let (siblings, index) = self.siblings(node)?;
        index.checked_sub(1).map(|i| NodeRef(siblings[i]))
    }

    fn text_data(&self, node: &NodeRef) -> Option<String> {
        self.nodes[node.0].text.clone()
    }
}

impl CaretGeometry for ArenaDom {
    fn caret_rect(&self, point: &BoundaryPoint<NodeRef>) -> Option<Rect> {
        self.measured.borrow_mut().push(point.clone());
        let (text_node, offset) = if self.nodes[point.node.0].text.is_some() {
            (Some(point.node), point.offset)
        } else {
            let child = self.child_at(&point.node, point.offset);
            (child.and_then(|c| self.first_text_in(c)), 0)
        };
        let text_node = text_node?;
        if self.hidden.contains(&text_node) {
            return None;
        }
        let (line, column) = self.nodes[text_node.0].position;
        let x = (column + offset) as f64 * CHAR_W;
        let top = line as f64 * LINE_H;
        Some(Rect::new(x, top, x, top + LINE_H - 2.0))
    }
}

// ─── Mirror host ─────────────────────────────────────────────────────────

/// Lays the mirror text out monospace, wrapping on `\n` only.
pub struct RecordingMirrorHost {
    pub client: ClientBox,
    pub mounts: Rc<Cell<u32>>,
    pub unmounts: Rc<Cell<u32>>,
    pub plans: RefCell<Vec<MirrorPlan>>,
    pub fail: bool,
    /// Mount succeeds but no caret can be measured.
    pub unmeasurable: bool,
}

impl RecordingMirrorHost {
    pub fn new(client: ClientBox) -> Self {
        Self {
            client,
            mounts: Rc::new(Cell::new(0)),
            unmounts: Rc::new(Cell::new(0)),
            plans: RefCell::new(Vec::new()),
            fail: false,
            unmeasurable: false,
        }
    }

    pub fn live_mirrors(&self) -> u32 {
        self.mounts.get() - self.unmounts.get()
    }
}

pub struct FakeMirror {
    plan: MirrorPlan,
    client: ClientBox,
    unmounts: Rc<Cell<u32>>,
    unmeasurable: bool,
}

impl MirrorHost for RecordingMirrorHost {
    type Mirror = FakeMirror;

    fn mount(&self, plan: &MirrorPlan) -> Result<FakeMirror, MirrorError> {
        if self.fail {
            return Err(MirrorError::Mount("no document body".into()));
        }
        self.mounts.set(self.mounts.get() + 1);
        self.plans.borrow_mut().push(plan.clone());
        Ok(FakeMirror {
            plan: plan.clone(),
            client: self.client,
            unmounts: self.unmounts.clone(),
            unmeasurable: self.unmeasurable,
        })
    }
}

impl MountedMirror for FakeMirror {
    fn caret_rect(&self, offset: u32) -> Option<Rect> {
        if self.unmeasurable {
            return None;
        }
        let before: Vec<u16> = self
            .plan
            .text
            .encode_utf16()
            .take(offset as usize)
            .collect();
        let before = String::from_utf16_lossy(&before);
        let line = before.matches('\n').count() as f64;
        let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) as f64;
        let x = self.plan.origin_left + self.client.left + column * CHAR_W - self.plan.scroll_left;
        let top = self.plan.origin_top + self.client.top + line * LINE_H - self.plan.scroll_top;
        Some(Rect::new(x, top, x, top + LINE_H - 2.0))
    }

    fn client_box(&self) -> ClientBox {
        self.client
    }

    fn unmount(&mut self) {
        self.unmounts.set(self.unmounts.get() + 1);
    }
}
