//! Arbor Select - selector query engine
//!
//! Compiles CSS-like selector strings (type, id, class, attribute
//! selectors, the four combinators and comma lists) and runs them against
//! any tree exposing [`DomRead`].
//!
//! ```ignore
//! use arbor_select::QuerySelector;
//!
//! let doc = arbor_html::parse("<div><p class=\"x\">hi</p></div>")?;
//! let hits = doc.query_selector_all("div > p.x")?;
//! assert_eq!(hits.length(), 1);
//! ```
//!
//! Results are unique and ordered alternative by alternative: all matches
//! of the first comma-separated alternative in tree order, then the new
//! matches of the next one, and so on.

mod combinator;
mod compiler;
mod grammar;
mod matcher;
mod node_list;
mod options;
mod query;
mod walker;

pub use combinator::Combinator;
pub use compiler::{Alternative, Compound, SelectorList, Step};
pub use grammar::{AttrOperator, AttributeTest, SimpleKind, SimpleSelector};
pub use node_list::NodeList;
pub use options::QueryOptions;
pub use query::{QuerySelector, query_selector, query_selector_all, query_selector_all_with};
pub use walker::{Children, Descendants, DomRead};

/// Selector engine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector string is outside the supported grammar
    #[error("Unsupported selector: {selector}")]
    InvalidSelectorSyntax { selector: String },

    /// The grammar accepted a selector the tokenizer could not split.
    /// Indicates a bug in the engine, never bad input.
    #[error("Internal selector engine error in {selector:?} at byte {position}")]
    Internal { selector: String, position: usize },
}

impl SelectorError {
    pub(crate) fn invalid(selector: &str) -> Self {
        Self::InvalidSelectorSyntax {
            selector: selector.to_string(),
        }
    }
}
