//! DOM Tree (arena-based allocation)

use std::collections::HashMap;

use crate::{DomError, DomResult, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Detached nodes stay in the arena
/// and can be re-inserted.
#[derive(Debug, Clone)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    /// First element seen per id value. Never purged on detach or id
    /// change, so lookups must be re-verified by the caller.
    ids: HashMap<String, NodeId>,
    /// Every element given each id value through `set_attribute` that
    /// still carried it at the last update of that value
    id_owners: HashMap<String, Vec<NodeId>>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            ids: HashMap::new(),
            id_owners: HashMap::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(Node::element(tag_name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::InvalidNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::InvalidNode(id))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = match self.get(current) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    /// Check whether a node is attached under the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Append a child node, detaching it from its current parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild(reference));
            }
            if reference == child {
                return Ok(child);
            }
        }

        self.detach(child);

        let (prev, next) = match reference {
            Some(reference) => (self.nodes[reference.index()].prev_sibling, reference),
            None => (self.nodes[parent.index()].last_child, NodeId::NONE),
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }

        Ok(child)
    }

    /// Remove a child node; the subtree stays in the arena, detached
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild(child));
        }
        self.detach(child);
        Ok(child)
    }

    fn detach(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[child.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        elem.attrs.set(name, value);

        if name == "id" && !value.is_empty() {
            let stale = match self.ids.get(value) {
                Some(&indexed) => !self.has_id(indexed, value) || !self.is_connected(indexed),
                None => true,
            };
            if stale {
                self.ids.insert(value.to_string(), id);
            }

            let nodes = &self.nodes;
            let owners = self.id_owners.entry(value.to_string()).or_default();
            owners.retain(|&owner| {
                nodes
                    .get(owner.index())
                    .and_then(Node::as_element)
                    .and_then(|e| e.id())
                    == Some(value)
            });
            if !owners.contains(&id) {
                owners.push(id);
            }
        }
        Ok(())
    }

    /// Remove an attribute from an element
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        Ok(elem.attrs.remove(name).map(|a| a.value))
    }

    fn has_id(&self, id: NodeId, value: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .and_then(|e| e.id())
            == Some(value)
    }

    /// Fast id lookup.
    ///
    /// Returns whatever the index recorded for `id`; the node may since have
    /// been detached or lost the id.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// The only element known to carry `id`.
    ///
    /// `None` when no element or more than one element (attached or not)
    /// was given this id. Ids written straight into an `AttributeMap`
    /// through `get_mut` are not tracked, and the owner may have lost the
    /// id since, so callers still verify the answer.
    pub fn unique_element_by_id(&self, id: &str) -> Option<NodeId> {
        match self.id_owners.get(id)?.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(Node::as_element)
            .map(|e| e.tag_name.as_str())
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Concatenated text of all descendant text nodes, in document order
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            if let Some(text) = node.as_text() {
                out.push_str(text);
            }
            // Push children in reverse so the first child is visited first
            let children: Vec<NodeId> = self.children(current).map(|(c, _)| c).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tree: &DomTree, parent: NodeId) -> Vec<NodeId> {
        tree.children(parent).map(|(id, _)| id).collect()
    }

    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(tree.root(), b).unwrap();
        tree.insert_before(tree.root(), c, Some(b)).unwrap();

        assert_eq!(ids(&tree, NodeId::ROOT), vec![a, c, b]);
        assert_eq!(tree.get(c).unwrap().prev_sibling, a);
        assert_eq!(tree.get(c).unwrap().next_sibling, b);
        assert_eq!(tree.get(NodeId::ROOT).unwrap().last_child, b);
    }

    #[test]
    fn test_remove_child_detaches() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        assert!(tree.is_connected(span));

        tree.remove_child(tree.root(), div).unwrap();
        assert!(!tree.is_connected(span));
        assert!(tree.is_inclusive_ancestor(div, span));
        assert!(ids(&tree, NodeId::ROOT).is_empty());
    }

    #[test]
    fn test_hierarchy_request() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        assert_eq!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(outer, NodeId::ROOT), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_id_index_is_not_purged() {
        let mut tree = DomTree::new();
        let first = tree.create_element("div");
        let second = tree.create_element("div");
        tree.append_child(tree.root(), first).unwrap();
        tree.append_child(tree.root(), second).unwrap();
        tree.set_attribute(first, "id", "x").unwrap();
        tree.set_attribute(second, "id", "x").unwrap();
        assert_eq!(tree.element_by_id("x"), Some(first));

        tree.remove_child(tree.root(), first).unwrap();
        // Stale until someone sets the id again
        assert_eq!(tree.element_by_id("x"), Some(first));
        tree.set_attribute(second, "id", "x").unwrap();
        assert_eq!(tree.element_by_id("x"), Some(second));
    }

    #[test]
    fn test_unique_id_owner() {
        let mut tree = DomTree::new();
        let first = tree.create_element("div");
        let second = tree.create_element("div");
        tree.append_child(tree.root(), first).unwrap();
        tree.append_child(tree.root(), second).unwrap();

        tree.set_attribute(first, "id", "x").unwrap();
        assert_eq!(tree.unique_element_by_id("x"), Some(first));
        // Setting the same id again does not count twice
        tree.set_attribute(first, "id", "x").unwrap();
        assert_eq!(tree.unique_element_by_id("x"), Some(first));

        tree.set_attribute(second, "id", "x").unwrap();
        assert_eq!(tree.unique_element_by_id("x"), None);

        // An owner that changed its id drops out on the next update
        tree.set_attribute(first, "id", "y").unwrap();
        tree.set_attribute(second, "id", "x").unwrap();
        assert_eq!(tree.unique_element_by_id("x"), Some(second));
        assert_eq!(tree.unique_element_by_id("y"), Some(first));
        assert_eq!(tree.unique_element_by_id("missing"), None);
    }

    #[test]
    fn test_attribute_on_text_fails() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hi");
        assert_eq!(tree.set_attribute(text, "id", "x"), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_text_content_order() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let b = tree.create_element("b");
        let t1 = tree.create_text("one ");
        let t2 = tree.create_text("two");
        let t3 = tree.create_text(" three");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, t1).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();
        tree.append_child(p, t3).unwrap();

        assert_eq!(tree.text_content(p), "one two three");
    }
}
