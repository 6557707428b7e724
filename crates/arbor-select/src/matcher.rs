//! Selector execution
//!
//! Runs a compiled [`SelectorList`] against a context node. Alternatives
//! are evaluated left to right and merged without re-sorting; a node
//! already produced by an earlier alternative is skipped.

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::ControlFlow;

use crate::compiler::{Alternative, Compound, SelectorList};
use crate::walker::{Descendants, DomRead};
use crate::{Combinator, NodeList, QueryOptions};

/// Receives matched nodes; `Break` asks the producer to stop walking
pub(crate) type Sink<'a, N> = dyn FnMut(N) -> ControlFlow<()> + 'a;

/// Insertion-ordered node set with an optional size cap
struct UniqueNodes<N> {
    nodes: Vec<N>,
    seen: HashSet<N>,
    limit: Option<usize>,
}

impl<N: Copy + Eq + Hash> UniqueNodes<N> {
    fn new(limit: Option<usize>) -> Self {
        Self {
            nodes: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    fn push(&mut self, node: N) -> ControlFlow<()> {
        if self.seen.insert(node) {
            self.nodes.push(node);
        }
        if self.is_full() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.nodes.len() >= limit)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

/// State for one top-level query call
pub(crate) struct Matcher<'t, T: DomRead + ?Sized> {
    tree: &'t T,
    context: T::NodeId,
    options: QueryOptions,
    /// Element descendants of `context`, filled on first use and dropped
    /// with the matcher
    descendants: Option<Vec<T::NodeId>>,
}

impl<'t, T: DomRead + ?Sized> Matcher<'t, T> {
    pub(crate) fn new(tree: &'t T, context: T::NodeId, options: &QueryOptions) -> Self {
        Self {
            tree,
            context,
            options: *options,
            descendants: None,
        }
    }

    #[inline]
    pub(crate) fn tree(&self) -> &'t T {
        self.tree
    }

    /// Evaluate every alternative and merge the results
    pub(crate) fn execute(mut self, list: &SelectorList) -> NodeList<T::NodeId> {
        let mut results = UniqueNodes::new(self.options.limit);
        let total = list.alternatives().len();

        for (i, alternative) in list.alternatives().iter().enumerate() {
            if results.is_full() {
                tracing::trace!(
                    "Result limit reached, skipping {} alternative(s)",
                    total - i
                );
                break;
            }
            tracing::trace!("Evaluating alternative {}/{}: {}", i + 1, total, alternative);
            // A break only means the limit was hit; checked on the next turn
            let _ = self.run_alternative(alternative, &mut results);
        }

        tracing::debug!("Selector {} matched {} node(s)", list, results.len());
        NodeList::from_vec(results.into_vec())
    }

    fn run_alternative(
        &mut self,
        alternative: &Alternative,
        results: &mut UniqueNodes<T::NodeId>,
    ) -> ControlFlow<()> {
        let Some((last, leading)) = alternative.steps().split_last() else {
            return ControlFlow::Continue(());
        };

        let mut left: Option<Vec<T::NodeId>> = None;
        let mut combinator: Option<Combinator> = None;
        for step in leading {
            let mut matched: UniqueNodes<T::NodeId> = UniqueNodes::new(None);
            let _ = self.step(left.as_deref(), combinator, &step.compound, &mut |node| {
                matched.push(node)
            });
            if matched.len() == 0 {
                return ControlFlow::Continue(());
            }
            left = Some(matched.into_vec());
            combinator = step.combinator;
        }

        self.step(left.as_deref(), combinator, &last.compound, &mut |node| {
            results.push(node)
        })
    }

    fn step(
        &mut self,
        left: Option<&[T::NodeId]>,
        combinator: Option<Combinator>,
        compound: &Compound,
        sink: &mut Sink<'_, T::NodeId>,
    ) -> ControlFlow<()> {
        match (left, combinator) {
            (Some(left), Some(combinator)) => combinator.apply(self, left, compound, sink),
            _ => self.collect(self.context, compound, sink),
        }
    }

    /// Feed every descendant of `root` matching `compound` into `sink`
    pub(crate) fn collect(
        &mut self,
        root: T::NodeId,
        compound: &Compound,
        sink: &mut Sink<'_, T::NodeId>,
    ) -> ControlFlow<()> {
        let tree = self.tree;

        if root == self.context {
            if let Some(id) = compound.id() {
                if let Some(found) = self.lookup_id(id, compound) {
                    return sink(found);
                }
            }

            if self.options.cache_descendants {
                for &node in self.cached_descendants() {
                    if compound.validate(tree, node) {
                        sink(node)?;
                    }
                }
                return ControlFlow::Continue(());
            }
        }

        for node in Descendants::new(tree, root) {
            if compound.validate(tree, node) {
                sink(node)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Feed the members of `targets` matching `compound` into `sink`, in
    /// document order. Targets must lie below the context.
    pub(crate) fn collect_among(
        &mut self,
        targets: &HashSet<T::NodeId>,
        compound: &Compound,
        sink: &mut Sink<'_, T::NodeId>,
    ) -> ControlFlow<()> {
        let tree = self.tree;

        if self.options.cache_descendants {
            for &node in self.cached_descendants() {
                if targets.contains(&node) && compound.validate(tree, node) {
                    sink(node)?;
                }
            }
            return ControlFlow::Continue(());
        }

        for node in Descendants::new(tree, self.context) {
            if targets.contains(&node) && compound.validate(tree, node) {
                sink(node)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn cached_descendants(&mut self) -> &[T::NodeId] {
        let tree = self.tree;
        let context = self.context;
        self.descendants.get_or_insert_with(|| {
            let all: Vec<T::NodeId> = Descendants::new(tree, context).collect();
            tracing::trace!("Cached {} descendant element(s)", all.len());
            all
        })
    }

    /// Id index fast path, only for a first-match query from the document
    /// node.
    ///
    /// The tree answers only for ids with a single owner, and the answer may
    /// be stale, so the hit must still carry the id, sit below the context
    /// and satisfy the whole compound.
    fn lookup_id(&self, id: &str, compound: &Compound) -> Option<T::NodeId> {
        if !self.options.use_id_index
            || self.options.limit != Some(1)
            || !self.tree.is_document(self.context)
        {
            return None;
        }
        let found = self.tree.element_by_id(id)?;
        let verified = self.tree.attribute(found, "id") == Some(id)
            && self.tree.is_descendant_of(found, self.context)
            && compound.validate(self.tree, found);
        if verified {
            Some(found)
        } else {
            tracing::trace!("Id index entry for {:?} rejected, walking the tree", id);
            None
        }
    }
}
