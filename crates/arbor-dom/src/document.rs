//! Document - High-level document API

use crate::{DomTree, ElementRef, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create an empty document (no structure)
    pub fn new() -> Self {
        Self::from_tree(DomTree::new())
    }

    /// Wrap an existing tree and locate its html/head/body elements
    pub fn from_tree(tree: DomTree) -> Self {
        let mut document = Self {
            tree,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        };
        document.finalize();
        document
    }

    /// Re-locate the `<html>`, `<head>` and `<body>` elements.
    ///
    /// Call after mutating the top of the tree.
    pub fn finalize(&mut self) {
        self.html_element = self.find_child(NodeId::ROOT, "html");
        self.head_element = self.find_child(self.html_element, "head");
        self.body_element = self.find_child(self.html_element, "body");
        tracing::trace!(
            "Document structure: html={} head={} body={}",
            self.html_element,
            self.head_element,
            self.body_element
        );
    }

    fn find_child(&self, parent: NodeId, tag: &str) -> NodeId {
        if !parent.is_valid() {
            return NodeId::NONE;
        }
        self.tree
            .children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.tag_name == tag))
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE)
    }

    /// Get document title
    pub fn title(&self) -> String {
        let title = self.find_child(self.head_element, "title");
        if title.is_valid() {
            self.tree.text_content(title)
        } else {
            String::new()
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<ElementRef<'_>> {
        self.element(self.html_element)
    }

    /// Get <head> element
    pub fn head(&self) -> Option<ElementRef<'_>> {
        self.element(self.head_element)
    }

    /// Get <body> element
    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.element(self.body_element)
    }

    /// Handle for an element node, `None` for other node kinds
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::new(&self.tree, id)
    }

    /// Get element by ID.
    ///
    /// Consults the tree's id index and falls back to a document-order scan
    /// when the indexed node is stale.
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        if let Some(indexed) = self.tree.element_by_id(id) {
            let current = self.element(indexed).filter(|e| e.id() == Some(id));
            if let Some(elem) = current {
                if self.tree.is_connected(indexed) {
                    return Some(elem);
                }
            }
        }
        self.find_element_with_id(id)
    }

    fn find_element_with_id(&self, target: &str) -> Option<ElementRef<'_>> {
        let mut stack = vec![NodeId::ROOT];
        while let Some(current) = stack.pop() {
            if let Some(elem) = self.element(current) {
                if elem.id() == Some(target) {
                    return Some(elem);
                }
            }
            let children: Vec<NodeId> = self.tree.children(current).map(|(c, _)| c).collect();
            stack.extend(children.into_iter().rev());
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
