//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to an arbor tree.

use arbor_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// Loader options
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Skip text nodes made only of whitespace
    pub drop_whitespace_text: bool,
    /// Keep comment nodes
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            drop_whitespace_text: false,
            keep_comments: true,
        }
    }
}

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut tree = DomTree::new();
        self.convert(&dom.document, &mut tree)?;

        tracing::debug!("Parsed {} nodes", tree.len());
        Ok(Document::from_tree(tree))
    }

    /// Copy the RcDom below `document` into `tree`, depth first
    fn convert(&self, document: &Handle, tree: &mut DomTree) -> Result<(), ParseError> {
        let mut stack: Vec<(Handle, NodeId)> = Vec::new();
        push_children(&mut stack, document, NodeId::ROOT);

        while let Some((handle, parent)) = stack.pop() {
            match &handle.data {
                RcNodeData::Document => {
                    push_children(&mut stack, &handle, parent);
                }
                RcNodeData::Doctype { name, .. } => {
                    let id = tree.create_doctype(name);
                    tree.append_child(parent, id)?;
                }
                RcNodeData::Text { contents } => {
                    let text = contents.borrow();
                    if self.options.drop_whitespace_text && text.trim().is_empty() {
                        continue;
                    }
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
                RcNodeData::Comment { contents } => {
                    if self.options.keep_comments {
                        let id = tree.create_comment(contents);
                        tree.append_child(parent, id)?;
                    }
                }
                RcNodeData::Element {
                    name,
                    attrs,
                    template_contents,
                    ..
                } => {
                    let id = tree.create_element(&name.local);
                    // Attach first so the id index sees a connected node
                    tree.append_child(parent, id)?;
                    for attr in attrs.borrow().iter() {
                        let attr_name = match &attr.name.prefix {
                            Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        tree.set_attribute(id, &attr_name, &attr.value)?;
                    }

                    push_children(&mut stack, &handle, id);
                    // Template contents become ordinary children
                    if let Some(contents) = template_contents.borrow().as_ref() {
                        push_children(&mut stack, contents, id);
                    }
                }
                RcNodeData::ProcessingInstruction { .. } => {}
            }
        }
        Ok(())
    }
}

/// Queue the children of `handle` so that the first child pops first
fn push_children(stack: &mut Vec<(Handle, NodeId)>, handle: &Handle, parent: NodeId) {
    for child in handle.children.borrow().iter().rev() {
        stack.push((child.clone(), parent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.tree()
            .children(parent)
            .filter_map(|(_, n)| n.as_element().map(|e| e.tag_name.clone()))
            .collect()
    }

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert_eq!(doc.title(), "Test");
        let body = doc.body().unwrap();
        assert_eq!(tags(&doc, body.node_id()), vec!["p"]);
        assert_eq!(body.text_content(), "Hello");
    }

    #[test]
    fn test_parse_fragment_gets_wrapped() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();

        // html5ever inserts html/head/body around fragments
        assert!(doc.document_element().is_some());
        assert!(doc.head().is_some());
        let body = doc.body().unwrap();
        assert_eq!(tags(&doc, body.node_id()), vec!["div"]);
    }

    #[test]
    fn test_attributes_in_source_order() {
        let doc = HtmlParser::new()
            .parse(r#"<div id="a" class="x y" data-value="1"></div>"#)
            .unwrap();
        let div = doc.get_element_by_id("a").unwrap();
        assert_eq!(
            div.attributes(),
            vec![("id", "a"), ("class", "x y"), ("data-value", "1")]
        );
    }

    #[test]
    fn test_whitespace_text_option() {
        let html = "<body><span>1</span> <span>2</span></body>";

        let kept = HtmlParser::new().parse(html).unwrap();
        let body = kept.body().unwrap().node_id();
        assert_eq!(kept.tree().children(body).count(), 3);

        let dropped = HtmlParser::with_options(ParseOptions {
            drop_whitespace_text: true,
            ..ParseOptions::default()
        })
        .parse(html)
        .unwrap();
        let body = dropped.body().unwrap().node_id();
        assert_eq!(dropped.tree().children(body).count(), 2);
    }

    #[test]
    fn test_comments_option() {
        let html = "<body><!-- note --><p>x</p></body>";
        let doc = HtmlParser::with_options(ParseOptions {
            keep_comments: false,
            ..ParseOptions::default()
        })
        .parse(html)
        .unwrap();
        let body = doc.body().unwrap().node_id();
        assert_eq!(doc.tree().children(body).count(), 1);
    }
}
