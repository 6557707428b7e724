//! Combinators
//!
//! Each combinator maps the node set matched so far (the left-hand side)
//! and the next compound selector to a new node set.

use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;

use crate::compiler::Compound;
use crate::matcher::{Matcher, Sink};
use crate::walker::{Children, DomRead};

/// Relation between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b` - the literal next sibling node
    AdjacentSibling,
    /// `a ~ b`
    GeneralSibling,
}

impl Combinator {
    pub const ALL: [Combinator; 4] = [
        Combinator::Descendant,
        Combinator::Child,
        Combinator::AdjacentSibling,
        Combinator::GeneralSibling,
    ];

    /// Operator character, `None` for the whitespace combinator
    pub fn symbol(self) -> Option<char> {
        match self {
            Self::Descendant => None,
            Self::Child => Some('>'),
            Self::AdjacentSibling => Some('+'),
            Self::GeneralSibling => Some('~'),
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == Some(symbol))
    }

    /// Regex fragment matching the separator text between two compounds
    pub(crate) fn fragment(self) -> String {
        match self.symbol() {
            Some(symbol) => format!(r"\s*{}\s*", regex::escape(&symbol.to_string())),
            None => r"\s+".to_string(),
        }
    }

    /// Feed every node related to `left` by this combinator that also
    /// matches `right` into `sink`, in document order. Stops as soon as the
    /// sink asks to.
    pub(crate) fn apply<T: DomRead + ?Sized>(
        self,
        matcher: &mut Matcher<'_, T>,
        left: &[T::NodeId],
        right: &Compound,
        sink: &mut Sink<'_, T::NodeId>,
    ) -> ControlFlow<()> {
        if self == Self::Descendant {
            // `left` is in document order, so each subtree either follows the
            // previous one or nests inside it and yields only duplicates
            for &node in left {
                matcher.collect(node, right, sink)?;
            }
            return ControlFlow::Continue(());
        }

        let targets = self.related(matcher.tree(), left);
        if targets.is_empty() {
            return ControlFlow::Continue(());
        }
        matcher.collect_among(&targets, right, sink)
    }

    /// Nodes reached from `left` through a child or sibling step
    fn related<T: DomRead + ?Sized>(self, tree: &T, left: &[T::NodeId]) -> HashSet<T::NodeId> {
        let mut targets = HashSet::new();
        for &node in left {
            match self {
                Self::Descendant => {}
                Self::Child => targets.extend(Children::new(tree, node)),
                Self::AdjacentSibling => {
                    // Whatever comes next, text nodes included
                    if let Some(next) = tree.next_sibling(node) {
                        targets.insert(next);
                    }
                }
                Self::GeneralSibling => {
                    let mut current = tree.next_sibling(node);
                    while let Some(sibling) = current {
                        // The rest of the run was added by an earlier sibling
                        if !targets.insert(sibling) {
                            break;
                        }
                        current = tree.next_sibling(sibling);
                    }
                }
            }
        }
        targets
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => write!(f, " {symbol} "),
            None => f.write_str(" "),
        }
    }
}
