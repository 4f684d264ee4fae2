use super::{NodeId, Tree};

/// Direct children of a node, first to last.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Children<'a> {
    pub(super) fn new(tree: &'a Tree, parent: NodeId) -> Self {
        Self {
            tree,
            next: tree.get(parent).and_then(|n| n.first_child()),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|n| n.next_sibling());
        Some(current)
    }
}

/// Pre-order walk without recursion, so deeply nested documents cannot
/// overflow the stack.
pub struct Descendants<'a> {
    tree: &'a Tree,
    start: NodeId,
    next: Option<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(super) fn new(tree: &'a Tree, start: NodeId) -> Self {
        Self {
            tree,
            start,
            next: tree.get(start).map(|_| start),
        }
    }

    /// Next node in pre-order after `id` that stays inside `start`'s subtree.
    fn advance(&self, id: NodeId) -> Option<NodeId> {
        let node = self.tree.get(id)?;
        if let Some(child) = node.first_child() {
            return Some(child);
        }
        let mut current = id;
        loop {
            if current == self.start {
                return None;
            }
            let node = self.tree.get(current)?;
            if let Some(sibling) = node.next_sibling() {
                return Some(sibling);
            }
            current = node.parent()?;
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.advance(current);
        Some(current)
    }
}

pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Ancestors<'a> {
    pub(super) fn new(tree: &'a Tree, id: NodeId) -> Self {
        Self {
            tree,
            next: tree.get(id).and_then(|n| n.parent()),
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|n| n.parent());
        Some(current)
    }
}
