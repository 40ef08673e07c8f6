//! DOM tree abstraction and document-order traversal.
//!
//! The resolver never touches a real DOM directly: each host (the browser
//! bridge, or an in-memory tree in tests) implements `DomTree`, and the
//! traversal helpers here reproduce `TreeWalker` (`SHOW_ALL`) semantics on
//! top of the five structural accessors.

use crate::text::utf16_len;
use std::fmt;

// ─── Tree trait ──────────────────────────────────────────────────────────

/// Read-only structural view of a document.
pub trait DomTree {
    /// A node handle. Equality must be identity.
    type Node: Clone + PartialEq + fmt::Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;
    fn last_child(&self, node: &Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Character data of a text node; `None` for every other node type.
    fn text_data(&self, node: &Self::Node) -> Option<String>;

    fn is_text(&self, node: &Self::Node) -> bool {
        self.text_data(node).is_some()
    }

    /// The `index`-th child, as addressed by a range boundary offset.
    fn child_at(&self, node: &Self::Node, index: u32) -> Option<Self::Node> {
        let mut child = self.first_child(node);
        for _ in 0..index {
            child = self.next_sibling(child.as_ref()?);
        }
        child
    }

    /// DOM "length": UTF-16 units for text, child count otherwise.
    fn node_length(&self, node: &Self::Node) -> u32 {
        if let Some(data) = self.text_data(node) {
            return utf16_len(&data);
        }
        let mut count = 0;
        let mut child = self.first_child(node);
        while let Some(c) = child {
            count += 1;
            child = self.next_sibling(&c);
        }
        count
    }
}

// ─── Boundary points & ranges ────────────────────────────────────────────

/// A `(container, offset)` position, as in `Range.startContainer/Offset`.
#[derive(Clone, PartialEq)]
pub struct BoundaryPoint<N> {
    pub node: N,
    pub offset: u32,
}

impl<N> BoundaryPoint<N> {
    pub fn new(node: N, offset: u32) -> Self {
        Self { node, offset }
    }
}

impl<N: fmt::Debug> fmt::Debug for BoundaryPoint<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.node, self.offset)
    }
}

/// A contiguous DOM range in document order (`start <= end`).
#[derive(Debug, Clone, PartialEq)]
pub struct DomRange<N> {
    pub start: BoundaryPoint<N>,
    pub end: BoundaryPoint<N>,
}

impl<N: PartialEq> DomRange<N> {
    pub fn new(start: BoundaryPoint<N>, end: BoundaryPoint<N>) -> Self {
        Self { start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

// ─── Traversal ───────────────────────────────────────────────────────────

/// Next node in pre-order, confined to the subtree of `root`.
pub fn next_node<T: DomTree>(tree: &T, node: &T::Node, root: &T::Node) -> Option<T::Node> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    following_node(tree, node, root)
}

/// Next node in pre-order that is not a descendant of `node`.
pub fn following_node<T: DomTree>(tree: &T, node: &T::Node, root: &T::Node) -> Option<T::Node> {
    let mut current = node.clone();
    loop {
        if current == *root {
            return None;
        }
        if let Some(sibling) = tree.next_sibling(&current) {
            return Some(sibling);
        }
        current = tree.parent(&current)?;
    }
}

/// Previous node in pre-order, confined to the subtree of `root`.
pub fn previous_node<T: DomTree>(tree: &T, node: &T::Node, root: &T::Node) -> Option<T::Node> {
    if node == root {
        return None;
    }
    match tree.previous_sibling(node) {
        Some(sibling) => Some(last_descendant_or_self(tree, sibling)),
        None => tree.parent(node),
    }
}

/// Deepest last descendant of `node` (or `node` itself if it is a leaf).
pub fn last_descendant_or_self<T: DomTree>(tree: &T, node: T::Node) -> T::Node {
    let mut current = node;
    while let Some(child) = tree.last_child(&current) {
        current = child;
    }
    current
}

/// The node itself followed by its ancestors, innermost first.
pub fn inclusive_ancestors<T: DomTree>(tree: &T, node: &T::Node) -> Vec<T::Node> {
    let mut out = vec![node.clone()];
    let mut current = node.clone();
    while let Some(parent) = tree.parent(&current) {
        out.push(parent.clone());
        current = parent;
    }
    out
}

/// `Range.commonAncestorContainer`.
pub fn common_ancestor<T: DomTree>(tree: &T, range: &DomRange<T::Node>) -> T::Node {
    let start_chain = inclusive_ancestors(tree, &range.start.node);
    let mut current = range.end.node.clone();
    loop {
        if start_chain.contains(&current) {
            return current;
        }
        match tree.parent(&current) {
            Some(parent) => current = parent,
            // Disconnected trees share no ancestor; fall back to the start's root.
            None => return start_chain.last().cloned().unwrap_or(current),
        }
    }
}

/// First node at or after a start boundary, within `root`.
pub fn node_after_boundary<T: DomTree>(
    tree: &T,
    point: &BoundaryPoint<T::Node>,
    root: &T::Node,
) -> Option<T::Node> {
    match tree.text_data(&point.node) {
        Some(data) => {
            if point.offset >= utf16_len(&data) {
                next_node(tree, &point.node, root)
            } else {
                Some(point.node.clone())
            }
        }
        None => match tree.child_at(&point.node, point.offset) {
            Some(child) => Some(child),
            None => following_node(tree, &point.node, root),
        },
    }
}

/// Last node at or before an end boundary, within `root`.
pub fn node_before_boundary<T: DomTree>(
    tree: &T,
    point: &BoundaryPoint<T::Node>,
    root: &T::Node,
) -> Option<T::Node> {
    if tree.is_text(&point.node) {
        if point.offset == 0 {
            previous_node(tree, &point.node, root)
        } else {
            Some(point.node.clone())
        }
    } else if point.offset == 0 {
        Some(point.node.clone())
    } else {
        tree.child_at(&point.node, point.offset - 1)
            .map(|child| last_descendant_or_self(tree, child))
    }
}

/// Collect the nodes from `first` to `last` inclusive, in document order.
///
/// Returns `None` if `last` is not reachable from `first` (i.e. `last`
/// precedes `first`, so the span is empty).
pub fn nodes_between<T: DomTree>(
    tree: &T,
    first: &T::Node,
    last: &T::Node,
    root: &T::Node,
) -> Option<Vec<T::Node>> {
    let mut out = Vec::new();
    let mut current = first.clone();
    loop {
        out.push(current.clone());
        if current == *last {
            return Some(out);
        }
        current = next_node(tree, &current, root)?;
    }
}

/// `Range.toString()`: concatenated character data inside the range.
pub fn range_text<T: DomTree>(tree: &T, range: &DomRange<T::Node>) -> String {
    use crate::text::utf16_slice;

    if range.start.node == range.end.node {
        return match tree.text_data(&range.start.node) {
            Some(data) => utf16_slice(&data, range.start.offset, range.end.offset),
            None => {
                let root = range.start.node.clone();
                collect_text(tree, range, &root)
            }
        };
    }
    let root = common_ancestor(tree, range);
    collect_text(tree, range, &root)
}

fn collect_text<T: DomTree>(tree: &T, range: &DomRange<T::Node>, root: &T::Node) -> String {
    use crate::text::utf16_slice;

    let (Some(first), Some(last)) = (
        node_after_boundary(tree, &range.start, root),
        node_before_boundary(tree, &range.end, root),
    ) else {
        return String::new();
    };
    let Some(nodes) = nodes_between(tree, &first, &last, root) else {
        return String::new();
    };

    let mut out = String::new();
    for node in &nodes {
        let Some(data) = tree.text_data(node) else {
            continue;
        };
        let from = if *node == range.start.node {
            range.start.offset
        } else {
            0
        };
        let to = if *node == range.end.node {
            range.end.offset
        } else {
            utf16_len(&data)
        };
        out.push_str(&utf16_slice(&data, from, to));
    }
    out
}
