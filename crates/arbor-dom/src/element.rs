//! Element handles
//!
//! Read-only view of one element node, with the accessors markup
//! callers expect (`getAttribute`, `textContent`, ...).

use crate::{DomTree, ElementData, NodeId};

/// Borrowed handle to an element in a tree
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    /// Wrap `id` if it names an element of `tree`
    pub fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        tree.get(id)?.as_element()?;
        Some(Self { tree, id })
    }

    /// Node id of this element
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// The tree this element lives in
    #[inline]
    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    fn data(&self) -> &'a ElementData {
        // Checked in `new`; nodes never change kind
        match self.tree.get(self.id).and_then(|n| n.as_element()) {
            Some(data) => data,
            None => unreachable!("ElementRef always points at an element"),
        }
    }

    pub fn tag_name(&self) -> &'a str {
        &self.data().tag_name
    }

    /// Attribute value, or `""` when the attribute is missing
    pub fn get_attribute(&self, name: &str) -> &'a str {
        self.attribute(name).unwrap_or("")
    }

    /// Attribute value, `None` when missing
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data().attrs.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data().attrs.has(name)
    }

    /// All attributes as `(name, value)` pairs, in source order
    pub fn attributes(&self) -> Vec<(&'a str, &'a str)> {
        self.data()
            .attrs
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect()
    }

    pub fn id(&self) -> Option<&'a str> {
        self.data().id()
    }

    /// Raw `class` attribute
    pub fn class_name(&self) -> &'a str {
        self.get_attribute("class")
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        self.tree.text_content(self.id)
    }

    /// Closest ancestor that is an element
    pub fn parent_element(&self) -> Option<ElementRef<'a>> {
        let parent = self.tree.parent(self.id)?;
        ElementRef::new(self.tree, parent)
    }

    /// Element children, skipping text and comments
    pub fn children(&self) -> Vec<ElementRef<'a>> {
        let tree = self.tree;
        tree.children(self.id)
            .filter_map(|(id, _)| ElementRef::new(tree, id))
            .collect()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}
