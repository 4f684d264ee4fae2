//! # Syntax Tree - Arena of Token-Indexed Nodes
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Each node
//! holds its parent, first/last child and prev/next sibling links, plus an
//! inclusive range of token indices (or `None` for synthetic nodes).
//!
//! ```text
//! Document
//! ├── Heading  tokens 0..=3
//! │   └── Text tokens 2..=2
//! └── Paragraph tokens 4..=9
//! ```
//!
//! ## Mutation
//!
//! All primitives check their arguments before touching any link, so an
//! `Err` always leaves the tree exactly as it was. A node being attached is
//! first detached from wherever it was; its own subtree moves with it.

mod kind;
mod traverse;

pub use kind::{LinkAttrs, NodeKind, ReferenceStyle};
pub use traverse::{Ancestors, Children, Descendants};

use serde::Serialize;
use thiserror::Error;

use crate::snapshot::SnapshotId;

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Inclusive range of token indices covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TokenRange {
    pub first: usize,
    pub last: usize,
}

impl TokenRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub token_range: Option<TokenRange>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    owner: Option<SnapshotId>,
}

impl Node {
    fn new(kind: NodeKind, token_range: Option<TokenRange>) -> Self {
        Self {
            kind,
            token_range,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
            owner: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next
    }

    /// The snapshot this node was assembled into, if any.
    pub fn owner(&self) -> Option<SnapshotId> {
        self.owner
    }

    /// True if the node has no parent and no siblings.
    pub fn is_detached(&self) -> bool {
        self.parent.is_none() && self.prev.is_none() && self.next.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("attaching {node:?} under {target:?} would create a cycle")]
    Cycle { node: NodeId, target: NodeId },
    #[error("{0:?} has no parent to insert a sibling into")]
    NoParent(NodeId),
    #[error("the root node cannot be moved or replaced")]
    Root,
}

/// Node arena with a fixed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(NodeKind::Document, None)
    }
}

impl Tree {
    pub fn new(root_kind: NodeKind, root_range: Option<TokenRange>) -> Self {
        Self {
            nodes: vec![Node::new(root_kind, root_range)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// All node ids in allocation order, attached or not.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// Allocate a detached node.
    pub fn new_node(&mut self, kind: NodeKind, token_range: Option<TokenRange>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, token_range));
        id
    }

    /// Allocate a node and link it as the last child of `parent`, which the
    /// caller guarantees exists.
    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        token_range: Option<TokenRange>,
    ) -> NodeId {
        let id = self.new_node(kind, token_range);
        self.link_last(parent, id);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        self.detach(child);
        self.link_last(parent, child);
        Ok(())
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        self.detach(child);
        let old_first = self.nodes[parent.index()].first_child;
        self.link_between(parent, None, old_first, child);
        Ok(())
    }

    /// Insert `node` as the previous sibling of `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) -> Result<(), TreeError> {
        let parent = self.check_sibling(sibling, node)?;
        self.detach(node);
        let prev = self.nodes[sibling.index()].prev;
        self.link_between(parent, prev, Some(sibling), node);
        Ok(())
    }

    /// Insert `node` as the next sibling of `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<(), TreeError> {
        let parent = self.check_sibling(sibling, node)?;
        self.detach(node);
        let next = self.nodes[sibling.index()].next;
        self.link_between(parent, Some(sibling), next, node);
        Ok(())
    }

    /// Unlink `node` (with its subtree) from its parent and siblings.
    /// Removing an already detached node is a no-op.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check_exists(node)?;
        self.detach(node);
        Ok(())
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        self.check_exists(old)?;
        self.check_exists(new)?;
        if old == self.root {
            return Err(TreeError::Root);
        }
        if old == new {
            return Ok(());
        }
        self.insert_before(old, new)?;
        self.detach(old);
        Ok(())
    }

    /// True if `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children::new(self, id)
    }

    /// Pre-order walk of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    pub(crate) fn stamp_owner(&mut self, owner: SnapshotId) {
        for node in &mut self.nodes {
            if node.owner.is_none() {
                node.owner = Some(owner);
            }
        }
    }

    fn check_exists(&self, id: NodeId) -> Result<(), TreeError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_exists(parent)?;
        self.check_exists(child)?;
        if child == self.root {
            return Err(TreeError::Root);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle {
                node: child,
                target: parent,
            });
        }
        Ok(())
    }

    /// Validates a sibling insertion and returns the shared parent.
    fn check_sibling(&self, sibling: NodeId, node: NodeId) -> Result<NodeId, TreeError> {
        self.check_exists(sibling)?;
        self.check_exists(node)?;
        if node == self.root {
            return Err(TreeError::Root);
        }
        let parent = self.nodes[sibling.index()]
            .parent
            .ok_or(TreeError::NoParent(sibling))?;
        if node == sibling || self.is_ancestor_or_self(node, parent) {
            return Err(TreeError::Cycle {
                node,
                target: sibling,
            });
        }
        Ok(parent)
    }

    fn detach(&mut self, id: NodeId) {
        let Node {
            parent, prev, next, ..
        } = self.nodes[id.index()];

        match prev {
            Some(p) => self.nodes[p.index()].next = next,
            None => {
                if let Some(par) = parent {
                    self.nodes[par.index()].first_child = next;
                }
            }
        }
        match next {
            Some(n) => self.nodes[n.index()].prev = prev,
            None => {
                if let Some(par) = parent {
                    self.nodes[par.index()].last_child = prev;
                }
            }
        }

        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let old_last = self.nodes[parent.index()].last_child;
        self.link_between(parent, old_last, None, child);
    }

    /// Link a detached `node` under `parent` between two adjacent siblings.
    fn link_between(
        &mut self,
        parent: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
        node: NodeId,
    ) {
        {
            let n = &mut self.nodes[node.index()];
            n.parent = Some(parent);
            n.prev = prev;
            n.next = next;
        }
        match prev {
            Some(p) => self.nodes[p.index()].next = Some(node),
            None => self.nodes[parent.index()].first_child = Some(node),
        }
        match next {
            Some(n) => self.nodes[n.index()].prev = Some(node),
            None => self.nodes[parent.index()].last_child = Some(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> NodeKind {
        NodeKind::Text {
            literal: s.to_string(),
        }
    }

    /// root -> [a, b, c]
    fn three_children() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::default();
        let root = tree.root();
        let a = tree.new_node(text("a"), None);
        let b = tree.new_node(text("b"), None);
        let c = tree.new_node(text("c"), None);
        for id in [a, b, c] {
            tree.append_child(root, id).unwrap();
        }
        (tree, a, b, c)
    }

    fn child_ids(tree: &Tree, id: NodeId) -> Vec<NodeId> {
        tree.children(id).collect()
    }

    #[test]
    fn append_links_siblings_both_ways() {
        let (tree, a, b, c) = three_children();
        let root = tree.root();
        assert_eq!(child_ids(&tree, root), vec![a, b, c]);
        assert_eq!(tree.get(root).unwrap().first_child(), Some(a));
        assert_eq!(tree.get(root).unwrap().last_child(), Some(c));
        assert_eq!(tree.get(b).unwrap().prev_sibling(), Some(a));
        assert_eq!(tree.get(b).unwrap().next_sibling(), Some(c));
        assert_eq!(tree.get(a).unwrap().prev_sibling(), None);
        assert_eq!(tree.get(c).unwrap().next_sibling(), None);
    }

    #[test]
    fn prepend_child_becomes_first() {
        let (mut tree, a, b, c) = three_children();
        let root = tree.root();
        let d = tree.new_node(text("d"), None);
        tree.prepend_child(root, d).unwrap();
        assert_eq!(child_ids(&tree, root), vec![d, a, b, c]);
    }

    #[test]
    fn insert_before_and_after() {
        let (mut tree, a, b, c) = three_children();
        let root = tree.root();
        let x = tree.new_node(text("x"), None);
        let y = tree.new_node(text("y"), None);
        tree.insert_before(a, x).unwrap();
        tree.insert_after(c, y).unwrap();
        assert_eq!(child_ids(&tree, root), vec![x, a, b, c, y]);
        assert_eq!(tree.get(root).unwrap().first_child(), Some(x));
        assert_eq!(tree.get(root).unwrap().last_child(), Some(y));
    }

    #[test]
    fn attaching_moves_node_from_previous_parent() {
        let (mut tree, a, b, c) = three_children();
        let root = tree.root();
        tree.append_child(a, c).unwrap();
        assert_eq!(child_ids(&tree, root), vec![a, b]);
        assert_eq!(child_ids(&tree, a), vec![c]);
        assert_eq!(tree.get(c).unwrap().parent(), Some(a));
        assert_eq!(tree.get(b).unwrap().next_sibling(), None);
    }

    #[test]
    fn moving_within_same_parent() {
        let (mut tree, a, b, c) = three_children();
        let root = tree.root();
        tree.insert_after(c, a).unwrap();
        assert_eq!(child_ids(&tree, root), vec![b, c, a]);
        tree.insert_before(b, a).unwrap();
        assert_eq!(child_ids(&tree, root), vec![a, b, c]);
    }

    #[test]
    fn remove_leaves_node_unlinked() {
        let (mut tree, a, b, c) = three_children();
        let root = tree.root();
        tree.remove(b).unwrap();
        assert_eq!(child_ids(&tree, root), vec![a, c]);
        assert!(tree.get(b).unwrap().is_detached());
        assert_eq!(tree.get(a).unwrap().next_sibling(), Some(c));
        assert_eq!(tree.get(c).unwrap().prev_sibling(), Some(a));

        // Removing again is harmless.
        tree.remove(b).unwrap();
    }

    #[test]
    fn remove_only_child_clears_parent_links() {
        let mut tree = Tree::default();
        let root = tree.root();
        let a = tree.new_node(text("a"), None);
        tree.append_child(root, a).unwrap();
        tree.remove(a).unwrap();
        assert_eq!(tree.get(root).unwrap().first_child(), None);
        assert_eq!(tree.get(root).unwrap().last_child(), None);
    }

    #[test]
    fn removed_subtree_keeps_its_children() {
        let (mut tree, a, b, _) = three_children();
        tree.append_child(a, b).unwrap();
        tree.remove(a).unwrap();
        assert_eq!(child_ids(&tree, a), vec![b]);
    }

    #[test]
    fn replace_swaps_in_place() {
        let (mut tree, a, b, c) = three_children();
        let root = tree.root();
        let x = tree.new_node(text("x"), None);
        tree.replace(b, x).unwrap();
        assert_eq!(child_ids(&tree, root), vec![a, x, c]);
        assert!(tree.get(b).unwrap().is_detached());
    }

    #[test]
    fn replace_with_self_is_noop() {
        let (mut tree, a, b, c) = three_children();
        tree.replace(b, b).unwrap();
        assert_eq!(child_ids(&tree, tree.root()), vec![a, b, c]);
    }

    #[test]
    fn attach_to_self_or_descendant_is_cycle() {
        let (mut tree, a, b, _) = three_children();
        tree.append_child(a, b).unwrap();
        let before = tree.clone();

        assert_eq!(
            tree.append_child(a, a),
            Err(TreeError::Cycle { node: a, target: a })
        );
        assert_eq!(
            tree.append_child(b, a),
            Err(TreeError::Cycle { node: a, target: b })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn sibling_of_parentless_node_is_error() {
        let mut tree = Tree::default();
        let lone = tree.new_node(text("lone"), None);
        let x = tree.new_node(text("x"), None);
        assert_eq!(tree.insert_before(lone, x), Err(TreeError::NoParent(lone)));
        assert_eq!(tree.insert_after(tree.root(), x), Err(TreeError::NoParent(tree.root())));
        assert!(tree.get(x).unwrap().is_detached());
    }

    #[test]
    fn root_cannot_be_replaced_or_attached() {
        let (mut tree, a, _, _) = three_children();
        let root = tree.root();
        let before = tree.clone();
        assert_eq!(tree.replace(root, a), Err(TreeError::Root));
        assert_eq!(tree.append_child(a, root), Err(TreeError::Root));
        assert_eq!(tree, before);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let (mut tree, a, _, _) = three_children();
        let ghost = NodeId(99);
        assert_eq!(tree.append_child(a, ghost), Err(TreeError::UnknownNode(ghost)));
        assert_eq!(tree.remove(ghost), Err(TreeError::UnknownNode(ghost)));
        assert_eq!(tree.replace(ghost, a), Err(TreeError::UnknownNode(ghost)));
        assert!(tree.get(ghost).is_none());
    }
}
