//! Arbor HTML loader
//!
//! Builds an `arbor_dom::Document` from markup using html5ever.

mod parser;

pub use parser::{HtmlParser, ParseOptions};

use arbor_dom::Document;

/// Parse an HTML string with default options
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build tree: {0}")]
    Tree(#[from] arbor_dom::DomError),
}
