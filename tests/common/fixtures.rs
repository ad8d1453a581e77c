use serde_json::{Value, json};

use element_identity::page::document::Document;
use element_identity::page::page_model::NodeId;
use element_identity::page::snapshot::{PageSnapshot, load_snapshot};
use element_identity::query::css::query_first;

pub fn fixture_path(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    path.to_string_lossy().into_owned()
}

/// html > head (hidden) + body > div#x > a, ul > li*3, two inputs, a disabled
/// button and a script.
pub fn list_page() -> Document {
    load_snapshot(&fixture_path("list_page.json")).unwrap()
}

/// Wrap a single element tree (the document element) into a `Document`.
pub fn document(root: Value) -> Document {
    PageSnapshot::from_value(json!({
        "url": "https://test.example/",
        "title": "Test",
        "root": root,
    }))
    .unwrap()
    .into_document()
}

/// `<html><body>{children}</body></html>`, both 800x600 and visible.
pub fn body_with(children: Value) -> Document {
    document(json!({
        "tag": "html",
        "rect": rect(0.0, 0.0, 800.0, 600.0),
        "children": [{
            "tag": "body",
            "rect": rect(0.0, 0.0, 800.0, 600.0),
            "children": children,
        }]
    }))
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Value {
    json!({ "x": x, "y": y, "width": width, "height": height })
}

/// A visible 100x20 box.
pub fn boxed() -> Value {
    rect(0.0, 0.0, 100.0, 20.0)
}

/// First element matching a CSS selector; panics when absent.
pub fn node(doc: &Document, selector: &str) -> NodeId {
    query_first(doc, selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no element matches {}", selector))
}
