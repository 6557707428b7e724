//! Comprehensive tests for arbor-dom
//!
//! Tree construction, document helpers and the id index.

use arbor_dom::{Document, DomTree, NodeId, NodeType};

fn build_page() -> Document {
    let mut tree = DomTree::new();
    let html = tree.create_element("html");
    let head = tree.create_element("head");
    let title = tree.create_element("title");
    let title_text = tree.create_text("Hello page");
    let body = tree.create_element("body");
    let div = tree.create_element("div");

    tree.append_child(tree.root(), html).unwrap();
    tree.append_child(html, head).unwrap();
    tree.append_child(head, title).unwrap();
    tree.append_child(title, title_text).unwrap();
    tree.append_child(html, body).unwrap();
    tree.append_child(body, div).unwrap();
    tree.set_attribute(div, "id", "content").unwrap();

    Document::from_tree(tree)
}

#[test]
fn test_dom_tree_creation() {
    let mut tree = DomTree::new();

    // div > span > text
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    let text = tree.create_text("Hello, World!");

    tree.append_child(tree.root(), div).unwrap();
    tree.append_child(div, span).unwrap();
    tree.append_child(span, text).unwrap();

    assert_eq!(tree.len(), 4); // root + div + span + text

    let div_node = tree.get(div).unwrap();
    assert_eq!(div_node.parent, tree.root());
    assert_eq!(div_node.first_child, span);

    let span_node = tree.get(span).unwrap();
    assert_eq!(span_node.parent, div);
    assert_eq!(span_node.first_child, text);
    assert_eq!(tree.get(text).unwrap().node_type(), NodeType::Text);
}

#[test]
fn test_dom_tree_siblings() {
    let mut tree = DomTree::new();

    let div = tree.create_element("div");
    let child1 = tree.create_element("p");
    let child2 = tree.create_element("p");
    let child3 = tree.create_element("p");

    tree.append_child(tree.root(), div).unwrap();
    tree.append_child(div, child1).unwrap();
    tree.append_child(div, child2).unwrap();
    tree.append_child(div, child3).unwrap();

    let node1 = tree.get(child1).unwrap();
    assert_eq!(node1.next_sibling, child2);
    assert!(!node1.prev_sibling.is_valid());

    let node3 = tree.get(child3).unwrap();
    assert_eq!(node3.prev_sibling, child2);
    assert!(!node3.next_sibling.is_valid());

    // Moving a node relinks both old and new neighbours
    tree.append_child(div, child1).unwrap();
    let order: Vec<NodeId> = tree.children(div).map(|(id, _)| id).collect();
    assert_eq!(order, vec![child2, child3, child1]);
}

#[test]
fn test_document_structure() {
    let doc = build_page();

    assert_eq!(doc.document_element().map(|e| e.tag_name()), Some("html"));
    assert_eq!(doc.head().map(|e| e.tag_name()), Some("head"));
    assert_eq!(doc.body().map(|e| e.tag_name()), Some("body"));
    assert_eq!(doc.title(), "Hello page");
}

#[test]
fn test_empty_document() {
    let doc = Document::new();
    assert!(doc.tree().is_empty());
    assert!(doc.body().is_none());
    assert_eq!(doc.title(), "");
    assert!(doc.get_element_by_id("x").is_none());
}

#[test]
fn test_get_element_by_id() {
    let doc = build_page();
    let found = doc.get_element_by_id("content").unwrap();
    assert_eq!(found.tag_name(), "div");
    assert!(doc.get_element_by_id("missing").is_none());
}

#[test]
fn test_get_element_by_id_survives_stale_index() {
    let mut doc = build_page();
    let body = doc.body().unwrap().node_id();
    let content = doc.get_element_by_id("content").unwrap().node_id();

    let replacement = doc.tree_mut().create_element("section");
    doc.tree_mut().append_child(body, replacement).unwrap();
    doc.tree_mut().set_attribute(replacement, "id", "content").unwrap();
    doc.tree_mut().remove_child(body, content).unwrap();

    // Index still points at the detached div
    assert_eq!(doc.tree().element_by_id("content"), Some(content));
    let found = doc.get_element_by_id("content").unwrap();
    assert_eq!(found.node_id(), replacement);
    assert_eq!(found.tag_name(), "section");
}
