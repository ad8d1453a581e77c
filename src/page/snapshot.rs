use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LocatorError, Result};
use crate::page::document::Document;
use crate::page::page_model::{ComputedStyle, Rect};

// ============================================================================
// Serialized page snapshot (output of the capture script)
// ============================================================================

/// A rendered page frozen into JSON: element tree plus the geometry and
/// computed style of every element at capture time.
///
/// The tree comes either nested under `root` or as the flat `nodes` list the
/// capture script emits. JSON nesting depth is capped by the parser, so only
/// the flat form holds arbitrarily deep pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub title: String,

    /// Document element as a nested tree; `None` for an empty document
    #[serde(default)]
    pub root: Option<SnapshotElement>,

    /// Every node in document order, each pointing at its parent's position
    /// in this list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<SnapshotNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotElement {
    pub tag: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub rect: Rect,

    #[serde(default)]
    pub style: ComputedStyle,

    /// Properties that change while the element is hovered
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hover_style: BTreeMap<String, String>,

    /// Script-assigned handler properties, by event name ("click", "mouseover")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<String>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub paint_order: i32,

    #[serde(default)]
    pub children: Vec<SnapshotChild>,
}

/// A child is either an element or a bare text node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SnapshotChild {
    Element(SnapshotElement),
    Text { text: String },
}

/// One entry of the flat node list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotNode {
    /// Index of the parent entry; `None` for the document element
    #[serde(default)]
    pub parent: Option<usize>,

    #[serde(flatten)]
    pub content: SnapshotChild,
}

impl PageSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LocatorError::Snapshot {
            context: "page snapshot".into(),
            source: e,
        })
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| LocatorError::Snapshot {
            context: "page snapshot value".into(),
            source: e,
        })
    }

    pub fn into_document(self) -> Document {
        Document::from_snapshot(self)
    }
}

/// Read a snapshot file from disk into a `Document`.
pub fn load_snapshot(path: &str) -> Result<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| LocatorError::Io {
        path: path.to_string(),
        source: e,
    })?;
    Ok(PageSnapshot::from_json(&content)?.into_document())
}
