//! Selector compiler
//!
//! Turns a selector string into a [`SelectorList`]: comma-separated
//! alternatives, each a chain of compound selectors joined by combinators.
//!
//! The whole string is first checked against the composed grammar so a
//! malformed tail can never be half-accepted by the greedy tokenizer.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::grammar::{self, SimpleKind, SimpleSelector};
use crate::matcher::Matcher;
use crate::walker::DomRead;
use crate::{Combinator, NodeList, QueryOptions, SelectorError};

/// Simple selectors that must all hold for one node, e.g. `div.a[b]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compound {
    parts: Vec<SimpleSelector>,
}

impl Compound {
    pub fn new(parts: Vec<SimpleSelector>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[SimpleSelector] {
        &self.parts
    }

    /// Required tag name, if the compound fixes one
    pub fn tag(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            SimpleSelector::Tag(tag) => Some(tag.as_str()),
            _ => None,
        })
    }

    /// Required id, if any
    pub fn id(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            SimpleSelector::Id(id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// Check one node against every part
    pub fn validate<T: DomRead + ?Sized>(&self, tree: &T, node: T::NodeId) -> bool {
        tree.is_element(node) && self.parts.iter().all(|p| p.validate(tree, node))
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// A compound selector and the combinator leading to the next step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub compound: Compound,
    /// `None` on the last step of an alternative
    pub combinator: Option<Combinator>,
}

/// One comma-separated branch of a selector list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alternative {
    steps: Vec<Step>,
}

impl Alternative {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step.compound)?;
            if let Some(combinator) = step.combinator {
                write!(f, "{combinator}")?;
            }
        }
        Ok(())
    }
}

/// Compiled selector list, reusable across queries and trees
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorList {
    alternatives: Vec<Alternative>,
}

impl SelectorList {
    /// Compile a selector string
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let input = selector.trim();
        if !grammar::is_supported(input) {
            tracing::debug!("Rejected unsupported selector {:?}", selector);
            return Err(SelectorError::invalid(selector));
        }

        let internal = |position: usize| SelectorError::Internal {
            selector: selector.to_string(),
            position,
        };

        let mut alternatives = Vec::new();
        let mut steps = Vec::new();
        let mut pos = 0;
        loop {
            let compound = read_compound(input, &mut pos).ok_or_else(|| internal(pos))?;
            if pos == input.len() {
                steps.push(Step {
                    compound,
                    combinator: None,
                });
                alternatives.push(Alternative { steps });
                break;
            }

            let caps = separator()
                .captures(&input[pos..])
                .ok_or_else(|| internal(pos))?;
            let consumed = caps.get(0).map_or(0, |m| m.end());
            let symbol = caps.get(1).and_then(|m| m.as_str().chars().next());
            match symbol {
                Some(',') => {
                    steps.push(Step {
                        compound,
                        combinator: None,
                    });
                    alternatives.push(Alternative {
                        steps: std::mem::take(&mut steps),
                    });
                }
                Some(symbol) => {
                    let combinator = Combinator::from_symbol(symbol).ok_or_else(|| internal(pos))?;
                    steps.push(Step {
                        compound,
                        combinator: Some(combinator),
                    });
                }
                None => steps.push(Step {
                    compound,
                    combinator: Some(Combinator::Descendant),
                }),
            }
            pos += consumed;
        }

        tracing::debug!(
            "Compiled selector {:?} into {} alternative(s)",
            input,
            alternatives.len()
        );
        Ok(Self { alternatives })
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Run against `context` (searching its descendants only)
    pub fn select<T: DomRead + ?Sized>(
        &self,
        tree: &T,
        context: T::NodeId,
        options: &QueryOptions,
    ) -> NodeList<T::NodeId> {
        Matcher::new(tree, context, options).execute(self)
    }

    /// First match below `context`
    pub fn first<T: DomRead + ?Sized>(&self, tree: &T, context: T::NodeId) -> Option<T::NodeId> {
        self.select(tree, context, &QueryOptions::default().with_limit(1))
            .item(0)
    }

    /// Every match below `context`
    pub fn all<T: DomRead + ?Sized>(&self, tree: &T, context: T::NodeId) -> NodeList<T::NodeId> {
        self.select(tree, context, &QueryOptions::default())
    }

    /// Check whether `node` would be returned when querying from the top of
    /// its tree
    pub fn matches<T: DomRead + ?Sized>(&self, tree: &T, node: T::NodeId) -> bool {
        if !tree.is_element(node) {
            return false;
        }
        let mut top = node;
        while let Some(parent) = tree.parent(top) {
            top = parent;
        }
        self.all(tree, top).contains(&node)
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, alternative) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{alternative}")?;
        }
        Ok(())
    }
}

/// Read one compound at `pos`, advancing past it
fn read_compound(input: &str, pos: &mut usize) -> Option<Compound> {
    let mut parts: Vec<SimpleSelector> = Vec::new();
    loop {
        let rest = &input[*pos..];
        let found = SimpleKind::ALL
            .into_iter()
            .filter(|kind| parts.is_empty() || !kind.leads_compound())
            .find_map(|kind| kind.recognize(rest));
        match found {
            Some((selector, len)) => {
                parts.push(selector);
                *pos += len;
            }
            None => break,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(Compound::new(parts))
    }
}

/// Text between two compounds: a list comma, an operator, or whitespace
fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| {
        let symbols: Vec<String> = std::iter::once(',')
            .chain(Combinator::ALL.iter().filter_map(|c| c.symbol()))
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let pattern = format!(r"^(?:\s*({})\s*|\s+)", symbols.join("|"));
        Regex::new(&pattern).unwrap_or_else(|err| panic!("invalid separator pattern: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{AttrOperator, AttributeTest};

    fn parse(s: &str) -> SelectorList {
        SelectorList::parse(s).unwrap()
    }

    #[test]
    fn test_single_compound() {
        let list = parse("div");
        assert_eq!(list.alternatives().len(), 1);
        let steps = list.alternatives()[0].steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].compound.tag(), Some("div"));
        assert_eq!(steps[0].combinator, None);
    }

    #[test]
    fn test_compound_parts_merge_into_one_step() {
        let list = parse(r#"div#main.a.b[data-x][title="t"]"#);
        let steps = list.alternatives()[0].steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].compound.parts(),
            &[
                SimpleSelector::Tag("div".into()),
                SimpleSelector::Id("main".into()),
                SimpleSelector::Class(vec!["a".into(), "b".into()]),
                SimpleSelector::Attribute(AttributeTest::exists("data-x")),
                SimpleSelector::Attribute(AttributeTest::new("title", AttrOperator::Equals, "t")),
            ]
        );
        assert_eq!(steps[0].compound.id(), Some("main"));
    }

    #[test]
    fn test_combinator_chain() {
        let list = parse("ul  li > a + span ~ em");
        let combinators: Vec<Option<Combinator>> =
            list.alternatives()[0].steps().iter().map(|s| s.combinator).collect();
        assert_eq!(
            combinators,
            vec![
                Some(Combinator::Descendant),
                Some(Combinator::Child),
                Some(Combinator::AdjacentSibling),
                Some(Combinator::GeneralSibling),
                None,
            ]
        );
    }

    #[test]
    fn test_selector_list() {
        let list = parse(" div , p>span,#x ");
        assert_eq!(list.alternatives().len(), 3);
        assert_eq!(list.alternatives()[1].steps().len(), 2);
        assert_eq!(list.to_string(), "div, p > span, #x");
    }

    #[test]
    fn test_invalid_selector() {
        let err = SelectorList::parse("1abc").unwrap_err();
        assert_eq!(
            err,
            SelectorError::InvalidSelectorSyntax {
                selector: "1abc".into()
            }
        );
        assert_eq!(err.to_string(), "Unsupported selector: 1abc");

        assert!(SelectorList::parse("").is_err());
        assert!(SelectorList::parse("div:first-child").is_err());
        assert!("a >".parse::<SelectorList>().is_err());
    }

    #[test]
    fn test_display_round_trips_canonical_text() {
        let text = r#"div.a > p[lang|="en"] ~ *, #x span"#;
        let list = parse(text);
        assert_eq!(list.to_string(), text);
        assert_eq!(parse(&list.to_string()), list);
    }
}
