use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::{css, xpath};

// ============================================================================
// Geometry and style primitives
// ============================================================================

/// Handle to an element (or text node) of a page. Only meaningful for the
/// page that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Bounding box in page coordinates, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Both dimensions are nonzero.
    pub fn has_area(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Pseudo-state a computed style can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoState {
    Hover,
}

/// Computed style of an element: property name to serialized value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    pub properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn display(&self) -> &str {
        self.get("display").unwrap_or("inline")
    }

    pub fn visibility(&self) -> &str {
        self.get("visibility").unwrap_or("visible")
    }

    pub fn opacity(&self) -> &str {
        self.get("opacity").unwrap_or("1")
    }

    pub fn cursor(&self) -> &str {
        self.get("cursor").unwrap_or("auto")
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// `display:none`, `visibility:hidden` or `opacity:0`.
    pub fn is_hidden(&self) -> bool {
        self.display() == "none" || self.visibility() == "hidden" || self.opacity() == "0"
    }

    /// Every property of `self` has the same value in `other`.
    ///
    /// Only the properties enumerated by `self` are compared, so the relation
    /// is not symmetric.
    pub fn is_equivalent_to(&self, other: &ComputedStyle) -> bool {
        self.properties
            .iter()
            .all(|(name, value)| other.get(name) == Some(value.as_str()))
    }
}

// ============================================================================
// Page collaborator
// ============================================================================

/// Read-only view of a rendered page.
///
/// Everything the classifiers, selector synthesizer, tree builder and matcher
/// know about a page comes through this trait. Implementations must not
/// mutate the page while answering queries.
pub trait Page {
    /// Top-level element (`<html>`), if the page has one.
    fn document_element(&self) -> Option<NodeId>;

    /// The `<body>` element, if present.
    fn body(&self) -> Option<NodeId>;

    /// Parent element; `None` for the document element.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Previous element sibling.
    fn previous_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Raw data of the direct text-node children, in document order.
    fn text_segments(&self, node: NodeId) -> Vec<&str>;

    /// Lowercase tag name.
    fn tag_name(&self, node: NodeId) -> &str;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)>;

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn bounding_box(&self, node: NodeId) -> Rect;

    fn computed_style(&self, node: NodeId, pseudo: Option<PseudoState>) -> ComputedStyle;

    /// Script-assigned event handler property (`el.onclick = ...`).
    fn has_handler(&self, node: NodeId, event: &str) -> bool;

    /// The `disabled` property.
    fn is_disabled(&self, node: NodeId) -> bool;

    /// Topmost rendered element under a page coordinate.
    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId>;

    /// Every element of the page in document order.
    fn all_elements(&self) -> Vec<NodeId>;

    /// Resolve a hierarchical path into an ordered node list.
    fn resolve_path(&self, path: &str) -> Result<Vec<NodeId>> {
        xpath::evaluate(self, path)
    }

    /// Resolve a CSS-like chain into a node list in document order.
    fn resolve_css(&self, selector: &str) -> Result<Vec<NodeId>> {
        css::query_all(self, selector)
    }
}
