use serde_json::{Value, json};

use element_identity::error::LocatorError;
use element_identity::page::page_model::{Page, PseudoState, Rect};
use element_identity::page::snapshot::{PageSnapshot, load_snapshot};
use element_identity::selector::point::absolute_path;
use element_identity::tree::builder::{build_page_tree, minify_html};
use element_identity::tree::tree_model::ExtractOptions;

use crate::common::fixtures::{body_with, boxed, document, fixture_path, list_page, node, rect};

mod common;

// ============================================================================
// Snapshot loading
// ============================================================================

#[test]
fn loads_fixture_snapshot() {
    let doc = list_page();
    assert_eq!(doc.url.as_deref(), Some("https://shop.example/"));
    assert_eq!(doc.title, "Shop");
    assert_eq!(doc.all_elements().len(), 14, "every element of the fixture");
}

#[test]
fn missing_snapshot_file_is_io_error() {
    let err = load_snapshot(&fixture_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, LocatorError::Io { .. }), "got {:?}", err);
}

#[test]
fn malformed_snapshot_is_reported() {
    let err = PageSnapshot::from_json("{ \"root\": 42 }").unwrap_err();
    assert!(matches!(err, LocatorError::Snapshot { .. }), "got {:?}", err);
}

#[test]
fn null_root_gives_empty_document() {
    let doc = PageSnapshot::from_json(r#"{ "root": null }"#)
        .unwrap()
        .into_document();
    assert!(doc.is_empty());
    assert_eq!(doc.document_element(), None);
    assert_eq!(doc.body(), None);
    assert!(doc.all_elements().is_empty());
}

#[test]
fn element_defaults_fill_missing_fields() {
    let doc = document(json!({ "tag": "HTML" }));
    let root = doc.document_element().unwrap();
    assert_eq!(doc.tag_name(root), "html", "tag names are lowercased");
    assert_eq!(doc.bounding_box(root), Rect::default());
    assert!(doc.computed_style(root, None).is_empty());
    assert!(!doc.is_disabled(root));
}

/// html > body > div * depth > "leaf", as the flat node list the capture
/// script emits.
fn nested_divs_flat(depth: usize) -> String {
    let mut nodes: Vec<Value> = vec![
        json!({ "tag": "html", "rect": rect(0.0, 0.0, 800.0, 600.0) }),
        json!({ "parent": 0, "tag": "body", "rect": rect(0.0, 0.0, 800.0, 600.0) }),
    ];
    for level in 0..depth {
        nodes.push(json!({ "parent": level + 1, "tag": "div", "rect": boxed() }));
    }
    nodes.push(json!({ "parent": depth + 1, "text": "leaf" }));

    json!({ "url": "https://deep.example/", "title": "Deep", "nodes": nodes }).to_string()
}

#[test]
fn flat_snapshot_loads_deeply_nested_page() {
    let depth = 250;
    let doc = PageSnapshot::from_json(&nested_divs_flat(depth))
        .expect("flat snapshots have no nesting limit")
        .into_document();

    assert_eq!(doc.title, "Deep");
    assert_eq!(doc.all_elements().len(), depth + 2);

    let deepest = *doc.all_elements().last().unwrap();
    assert_eq!(doc.text_segments(deepest), vec!["leaf"]);
    assert_eq!(
        absolute_path(&doc, deepest),
        format!("/html/body{}", "/div".repeat(depth))
    );

    let tree = build_page_tree(&doc, &ExtractOptions::default()).unwrap();
    assert_eq!(tree.node_count(), depth + 2, "every level is visible");
}

#[test]
fn flat_and_nested_snapshots_build_the_same_document() {
    let nested = body_with(json!([
        { "tag": "p", "rect": boxed(), "children": [{ "text": "Hi" }] },
        { "tag": "a", "rect": boxed(), "attributes": { "href": "/x" } },
    ]));
    let flat = PageSnapshot::from_json(
        &json!({
            "url": "https://test.example/",
            "title": "Test",
            "nodes": [
                { "tag": "html", "rect": rect(0.0, 0.0, 800.0, 600.0) },
                { "parent": 0, "tag": "body", "rect": rect(0.0, 0.0, 800.0, 600.0) },
                { "parent": 1, "tag": "p", "rect": boxed() },
                { "parent": 2, "text": "Hi" },
                { "parent": 1, "tag": "a", "rect": boxed(), "attributes": { "href": "/x" } },
            ]
        })
        .to_string(),
    )
    .unwrap()
    .into_document();

    let options = ExtractOptions::default();
    assert_eq!(flat.len(), nested.len());
    assert_eq!(minify_html(&flat, &options).unwrap(), minify_html(&nested, &options).unwrap());
}

#[test]
fn flat_snapshot_drops_nodes_without_a_usable_parent() {
    let doc = PageSnapshot::from_json(
        &json!({
            "nodes": [
                { "tag": "html" },
                { "parent": 0, "text": "stray" },
                { "parent": 1, "tag": "span" },
                { "parent": 9, "tag": "em" },
                { "tag": "second-root" },
                { "parent": 0, "tag": "body" },
            ]
        })
        .to_string(),
    )
    .unwrap()
    .into_document();

    let tags: Vec<&str> = doc.all_elements().into_iter().map(|n| doc.tag_name(n)).collect();
    assert_eq!(tags, vec!["html", "body"], "text parents, unknown parents and extra roots are dropped");
    assert!(doc.body().is_some());
}

// ============================================================================
// Tree navigation
// ============================================================================

#[test]
fn body_is_found_under_document_element() {
    let doc = list_page();
    let body = doc.body().unwrap();
    assert_eq!(doc.tag_name(body), "body");
    assert_eq!(doc.parent(body), doc.document_element());
}

#[test]
fn children_skip_text_nodes() {
    let doc = list_page();
    let header = node(&doc, "div#x");
    let children = doc.children(header);
    assert_eq!(children.len(), 1);
    assert_eq!(doc.tag_name(children[0]), "a");
}

#[test]
fn previous_sibling_skips_text_nodes() {
    let doc = body_with(json!([
        { "tag": "p" },
        { "text": "between" },
        { "tag": "span" },
    ]));
    let span = node(&doc, "span");
    let p = node(&doc, "p");
    assert_eq!(doc.previous_sibling(span), Some(p));
    assert_eq!(doc.previous_sibling(p), None);
}

#[test]
fn text_segments_are_direct_text_children_only() {
    let doc = body_with(json!([{
        "tag": "div",
        "children": [
            { "text": "Hello" },
            { "tag": "span", "children": [{ "text": "World" }] },
            { "text": "again" },
        ]
    }]));
    let div = node(&doc, "div");
    assert_eq!(doc.text_segments(div), vec!["Hello", "again"]);
}

#[test]
fn node_ids_follow_document_order() {
    let doc = list_page();
    let elements = doc.all_elements();
    let mut sorted = elements.clone();
    sorted.sort();
    assert_eq!(elements, sorted);
    assert!(node(&doc, "div#x") < node(&doc, "ul"));
    assert!(node(&doc, "ul") < node(&doc, "li"));
}

#[test]
fn find_by_attribute_returns_first_match() {
    let doc = list_page();
    let q = doc.find_by_attribute("name", "q").unwrap();
    assert_eq!(doc.attribute(q, "placeholder"), Some("Search"));
    assert_eq!(doc.find_by_attribute("name", "missing"), None);
}

// ============================================================================
// Styles
// ============================================================================

#[test]
fn hover_style_overrides_base_style() {
    let doc = body_with(json!([{
        "tag": "a",
        "rect": boxed(),
        "style": { "color": "black", "cursor": "auto" },
        "hover_style": { "color": "red" },
    }]));
    let a = node(&doc, "a");

    let base = doc.computed_style(a, None);
    let hover = doc.computed_style(a, Some(PseudoState::Hover));
    assert_eq!(base.get("color"), Some("black"));
    assert_eq!(hover.get("color"), Some("red"));
    assert_eq!(hover.get("cursor"), Some("auto"), "untouched properties carry over");
    assert!(!base.is_equivalent_to(&hover));
}

#[test]
fn missing_style_properties_read_as_visible() {
    let doc = body_with(json!([{ "tag": "span", "rect": boxed() }]));
    let style = doc.computed_style(node(&doc, "span"), None);
    assert_eq!(style.display(), "inline");
    assert_eq!(style.visibility(), "visible");
    assert_eq!(style.opacity(), "1");
    assert!(!style.is_hidden());
}

// ============================================================================
// Hit testing
// ============================================================================

#[test]
fn element_from_point_prefers_deepest_element() {
    let doc = list_page();
    let hit = doc.element_from_point(50.0, 25.0).unwrap();
    assert_eq!(doc.tag_name(hit), "a");
}

#[test]
fn element_from_point_prefers_higher_paint_order() {
    let doc = body_with(json!([
        { "tag": "div", "attributes": { "id": "overlay" }, "rect": rect(0.0, 0.0, 200.0, 200.0), "paint_order": 10 },
        { "tag": "div", "attributes": { "id": "under" }, "rect": rect(0.0, 0.0, 200.0, 200.0) },
    ]));
    let hit = doc.element_from_point(100.0, 100.0).unwrap();
    assert_eq!(doc.attribute(hit, "id"), Some("overlay"));
}

#[test]
fn element_from_point_ignores_hidden_and_empty_boxes() {
    let doc = body_with(json!([
        { "tag": "div", "attributes": { "id": "hidden" }, "rect": rect(0.0, 0.0, 200.0, 200.0), "style": { "display": "none" } },
        { "tag": "div", "attributes": { "id": "invisible" }, "rect": rect(0.0, 0.0, 200.0, 200.0), "style": { "visibility": "hidden" } },
        { "tag": "div", "attributes": { "id": "empty" }, "rect": rect(0.0, 0.0, 0.0, 200.0) },
    ]));
    let hit = doc.element_from_point(100.0, 100.0).unwrap();
    assert_eq!(doc.tag_name(hit), "body");
}

#[test]
fn element_from_point_outside_page_is_none() {
    let doc = list_page();
    assert_eq!(doc.element_from_point(900.0, 900.0), None);
}
