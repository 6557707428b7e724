//! Arbor DOM - Document Object Model
//!
//! Arena-backed markup tree: elements, attributes and text, linked by
//! parent/child/sibling ids, with an optional id lookup index.

mod attributes;
mod document;
mod element;
mod node;
mod tree;

pub use attributes::{Attr, AttributeMap};
pub use document::Document;
pub use element::ElementRef;
pub use node::{ElementData, Node, NodeData, NodeType};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id refers to a node rather than the null link
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `Some(self)` unless this is the null link
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Id does not belong to this tree
    #[error("Node {0} not found")]
    InvalidNode(NodeId),

    /// Attribute operation on a non-element
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// Inserting an ancestor into its own subtree, or moving the document node
    #[error("Hierarchy request error")]
    HierarchyRequest,

    /// Reference node is not a child of the given parent
    #[error("Node {0} is not a child")]
    NotAChild(NodeId),
}
