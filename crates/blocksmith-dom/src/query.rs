//! Descendant traversal and lookup helpers.
//!
//! All queries walk descendants of the given root in document (pre-order)
//! order; the root itself is never matched, mirroring how a block decorator
//! scopes its selectors to the block element.

use crate::node::{Document, NodeId};

/// Pre-order iterator over the descendants of a node, root excluded.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children reversed so the leftmost child is visited first.
        for &child in self.doc.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

impl Document {
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(root).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// First descendant element satisfying `pred`, document order.
    pub fn find_first(&self, root: NodeId, pred: impl Fn(&Document, NodeId) -> bool) -> Option<NodeId> {
        self.descendants(root)
            .find(|&id| self.is_element(id) && pred(self, id))
    }

    /// All descendant elements satisfying `pred`, document order.
    pub fn find_all(&self, root: NodeId, pred: impl Fn(&Document, NodeId) -> bool) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.is_element(id) && pred(self, id))
            .collect()
    }

    pub fn first_with_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.find_first(root, |doc, id| doc.tag(id) == Some(tag))
    }

    pub fn all_with_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_all(root, |doc, id| doc.tag(id) == Some(tag))
    }

    pub fn first_with_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.find_first(root, |doc, id| doc.has_class(id, class))
    }

    pub fn all_with_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.find_all(root, |doc, id| doc.has_class(id, class))
    }

    /// First descendant heading (`h1`..`h6`), document order.
    pub fn first_heading(&self, root: NodeId) -> Option<NodeId> {
        self.find_first(root, |doc, id| doc.heading_level(id).is_some())
    }
}
