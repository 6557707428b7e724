//! Query results

use arbor_dom::NodeId;

/// Ordered, duplicate-free snapshot of matched nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeList<N = NodeId> {
    nodes: Vec<N>,
}

impl<N: Copy + PartialEq> NodeList<N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn from_vec(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index`, `None` when out of range
    pub fn item(&self, index: usize) -> Option<N> {
        self.nodes.get(index).copied()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[N] {
        &self.nodes
    }

    pub fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

impl<N: Copy + PartialEq> Default for NodeList<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> IntoIterator for NodeList<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, N> IntoIterator for &'a NodeList<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
