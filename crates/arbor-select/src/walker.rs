//! Tree walking
//!
//! The read-only view the engine needs from a tree, and the traversal
//! primitives built on it. Walks are iterative so deeply nested markup
//! cannot exhaust the call stack.

use std::fmt::Debug;
use std::hash::Hash;

use arbor_dom::{DomTree, NodeId};

/// Read access to a markup tree
pub trait DomRead {
    /// Node handle; compared by identity
    type NodeId: Copy + Eq + Hash + Debug;

    /// Tag name, `None` for anything that is not an element
    fn tag_name(&self, node: Self::NodeId) -> Option<&str>;

    /// Attribute value, `None` when absent
    fn attribute(&self, node: Self::NodeId, name: &str) -> Option<&str>;

    /// Number of attributes on an element
    fn attribute_count(&self, node: Self::NodeId) -> usize;

    fn first_child(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    fn next_sibling(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// True for the whole-document node
    fn is_document(&self, node: Self::NodeId) -> bool;

    /// Fast id lookup, only consulted for a first-match query from the
    /// document node.
    ///
    /// Answer only when `id` is known to belong to a single element, so no
    /// earlier element in document order can carry it. The answer may be
    /// stale; the engine re-verifies it.
    fn element_by_id(&self, _id: &str) -> Option<Self::NodeId> {
        None
    }

    #[inline]
    fn is_element(&self, node: Self::NodeId) -> bool {
        self.tag_name(node).is_some()
    }

    /// Check whether `node` lies strictly below `ancestor`
    fn is_descendant_of(&self, node: Self::NodeId, ancestor: Self::NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }
}

impl DomRead for DomTree {
    type NodeId = NodeId;

    #[inline]
    fn tag_name(&self, node: NodeId) -> Option<&str> {
        DomTree::tag_name(self, node)
    }

    #[inline]
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.as_element()?.get_attr(name)
    }

    fn attribute_count(&self, node: NodeId) -> usize {
        self.get(node)
            .and_then(|n| n.as_element())
            .map_or(0, |e| e.attrs.len())
    }

    #[inline]
    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.first_child.to_option()
    }

    #[inline]
    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.next_sibling.to_option()
    }

    #[inline]
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        DomTree::parent(self, node)
    }

    #[inline]
    fn is_document(&self, node: NodeId) -> bool {
        node == NodeId::ROOT
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        DomTree::unique_element_by_id(self, id)
    }
}

/// Direct children of a node, every node kind included
pub struct Children<'t, T: DomRead + ?Sized> {
    tree: &'t T,
    next: Option<T::NodeId>,
}

impl<'t, T: DomRead + ?Sized> Children<'t, T> {
    pub fn new(tree: &'t T, parent: T::NodeId) -> Self {
        Self {
            tree,
            next: tree.first_child(parent),
        }
    }
}

impl<T: DomRead + ?Sized> Iterator for Children<'_, T> {
    type Item = T::NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Element descendants of a node in document order (pre-order).
///
/// The root itself is not yielded. Only elements are descended into.
pub struct Descendants<'t, T: DomRead + ?Sized> {
    tree: &'t T,
    /// Next node to visit on top
    stack: Vec<T::NodeId>,
}

impl<'t, T: DomRead + ?Sized> Descendants<'t, T> {
    pub fn new(tree: &'t T, root: T::NodeId) -> Self {
        let mut stack = Vec::with_capacity(16);
        if let Some(first) = tree.first_child(root) {
            stack.push(first);
        }
        Self { tree, stack }
    }
}

impl<T: DomRead + ?Sized> Iterator for Descendants<'_, T> {
    type Item = T::NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Sibling below child: the subtree is finished first
            if let Some(sibling) = self.tree.next_sibling(node) {
                self.stack.push(sibling);
            }
            if self.tree.is_element(node) {
                if let Some(child) = self.tree.first_child(node) {
                    self.stack.push(child);
                }
                return Some(node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(tree: &DomTree, nodes: impl Iterator<Item = NodeId>) -> Vec<String> {
        nodes
            .map(|n| tree.tag_name(n).unwrap_or("#text").to_string())
            .collect()
    }

    #[test]
    fn test_descendants_pre_order() {
        // <a><b><c/></b>text<d/></a><e/>
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        let text = tree.create_text("text");
        let d = tree.create_element("d");
        let e = tree.create_element("e");
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(b, c).unwrap();
        tree.append_child(a, text).unwrap();
        tree.append_child(a, d).unwrap();
        tree.append_child(NodeId::ROOT, e).unwrap();

        let all = Descendants::new(&tree, NodeId::ROOT);
        assert_eq!(tags(&tree, all), vec!["a", "b", "c", "d", "e"]);

        let under_a = Descendants::new(&tree, a);
        assert_eq!(tags(&tree, under_a), vec!["b", "c", "d"]);

        assert_eq!(Descendants::new(&tree, c).count(), 0);
    }

    #[test]
    fn test_children_include_text() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("x");
        let b = tree.create_element("b");
        tree.append_child(NodeId::ROOT, p).unwrap();
        tree.append_child(p, text).unwrap();
        tree.append_child(p, b).unwrap();

        let children: Vec<NodeId> = Children::new(&tree, p).collect();
        assert_eq!(children, vec![text, b]);
    }

    #[test]
    fn test_deep_nesting_is_iterative() {
        let mut tree = DomTree::new();
        let mut parent = NodeId::ROOT;
        for _ in 0..10_000 {
            let div = tree.create_element("div");
            tree.append_child(parent, div).unwrap();
            parent = div;
        }

        assert_eq!(Descendants::new(&tree, NodeId::ROOT).count(), 10_000);
        assert!(tree.is_descendant_of(parent, NodeId::ROOT));
    }

    #[test]
    fn test_dom_tree_read_interface() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(NodeId::ROOT, div).unwrap();
        tree.set_attribute(div, "id", "main").unwrap();

        assert!(tree.is_document(NodeId::ROOT));
        assert!(!tree.is_document(div));
        assert_eq!(DomRead::attribute(&tree, div, "id"), Some("main"));
        assert_eq!(tree.attribute_count(div), 1);
        assert_eq!(DomRead::element_by_id(&tree, "main"), Some(div));
        assert!(!tree.is_element(NodeId::ROOT));
    }
}
