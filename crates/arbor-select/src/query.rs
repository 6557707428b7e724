//! Query entry points
//!
//! `query_selector` and `query_selector_all` as free functions over any
//! [`DomRead`] tree, plus the [`QuerySelector`] trait for the arbor-dom
//! document and element handles.

use arbor_dom::{Document, DomTree, ElementRef, NodeId};

use crate::walker::DomRead;
use crate::{NodeList, QueryOptions, SelectorError, SelectorList};

/// Selector queries rooted at a node
pub trait QuerySelector {
    type NodeId;

    /// First matching descendant, `None` when nothing matches
    fn query_selector(&self, selector: &str) -> Result<Option<Self::NodeId>, SelectorError>;

    /// Every matching descendant
    fn query_selector_all(&self, selector: &str) -> Result<NodeList<Self::NodeId>, SelectorError>;
}

impl QuerySelector for DomTree {
    type NodeId = NodeId;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        query_selector(self, NodeId::ROOT, selector)
    }

    fn query_selector_all(&self, selector: &str) -> Result<NodeList<NodeId>, SelectorError> {
        query_selector_all(self, NodeId::ROOT, selector)
    }
}

impl QuerySelector for Document {
    type NodeId = NodeId;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        query_selector(self.tree(), NodeId::ROOT, selector)
    }

    fn query_selector_all(&self, selector: &str) -> Result<NodeList<NodeId>, SelectorError> {
        query_selector_all(self.tree(), NodeId::ROOT, selector)
    }
}

impl QuerySelector for ElementRef<'_> {
    type NodeId = NodeId;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        query_selector(self.tree(), self.node_id(), selector)
    }

    fn query_selector_all(&self, selector: &str) -> Result<NodeList<NodeId>, SelectorError> {
        query_selector_all(self.tree(), self.node_id(), selector)
    }
}

/// First descendant of `context` matching `selector`.
///
/// Same as the first item of [`query_selector_all`], but the walk stops
/// at the first hit.
pub fn query_selector<T: DomRead + ?Sized>(
    tree: &T,
    context: T::NodeId,
    selector: &str,
) -> Result<Option<T::NodeId>, SelectorError> {
    let options = QueryOptions::default().with_limit(1);
    Ok(query_selector_all_with(tree, context, selector, &options)?.item(0))
}

/// Every descendant of `context` matching `selector`
pub fn query_selector_all<T: DomRead + ?Sized>(
    tree: &T,
    context: T::NodeId,
    selector: &str,
) -> Result<NodeList<T::NodeId>, SelectorError> {
    query_selector_all_with(tree, context, selector, &QueryOptions::default())
}

pub fn query_selector_all_with<T: DomRead + ?Sized>(
    tree: &T,
    context: T::NodeId,
    selector: &str,
    options: &QueryOptions,
) -> Result<NodeList<T::NodeId>, SelectorError> {
    let list = SelectorList::parse(selector)?;
    Ok(list.select(tree, context, options))
}
