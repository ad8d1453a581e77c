use std::collections::BTreeMap;

use tracing::warn;

use crate::page::page_model::{ComputedStyle, NodeId, Page, PseudoState, Rect};
use crate::page::snapshot::{PageSnapshot, SnapshotChild, SnapshotElement, SnapshotNode};

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    rect: Rect,
    style: ComputedStyle,
    hover_style: BTreeMap<String, String>,
    handlers: Vec<String>,
    disabled: bool,
    paint_order: i32,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed page built from a `PageSnapshot`.
///
/// Nodes are stored in pre-order, so comparing two `NodeId`s compares their
/// document order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub url: Option<String>,
    pub title: String,
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Document {
    pub fn from_snapshot(snapshot: PageSnapshot) -> Self {
        let mut doc = Document {
            url: snapshot.url,
            title: snapshot.title,
            nodes: Vec::new(),
            root: None,
        };

        if let Some(root) = snapshot.root {
            doc.root = Some(doc.push_tree(SnapshotChild::Element(root), None));
        }
        doc.push_flat(snapshot.nodes);

        doc
    }

    /// Append `child` and its subtree in pre-order; returns the id of `child`.
    fn push_tree(&mut self, child: SnapshotChild, parent: Option<NodeId>) -> NodeId {
        let first = NodeId(self.nodes.len());
        let mut stack = vec![(child, parent)];

        while let Some((child, parent)) = stack.pop() {
            let id = NodeId(self.nodes.len());
            let (kind, children) = match child {
                SnapshotChild::Text { text } => (NodeKind::Text(text), Vec::new()),
                SnapshotChild::Element(element) => split_element(element),
            };

            self.nodes.push(Node {
                parent,
                children: Vec::with_capacity(children.len()),
                kind,
            });
            if let Some(p) = parent {
                self.nodes[p.0].children.push(id);
            }
            stack.extend(children.into_iter().rev().map(|c| (c, Some(id))));
        }

        first
    }

    /// Append a flat node list. Entries must come in document order with
    /// each parent listed before its children; an entry whose parent is
    /// missing or not an element is dropped along with its descendants.
    fn push_flat(&mut self, entries: Vec<SnapshotNode>) {
        let mut ids: Vec<Option<NodeId>> = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            let id = match entry.parent {
                None if self.root.is_none() && matches!(entry.content, SnapshotChild::Element(_)) => {
                    let id = self.push_tree(entry.content, None);
                    self.root = Some(id);
                    Some(id)
                }
                None => {
                    warn!(index, "extra top-level snapshot node, dropping it");
                    None
                }
                Some(p) => match ids.get(p).copied().flatten().filter(|&pid| self.is_element(pid)) {
                    Some(parent) => Some(self.push_tree(entry.content, Some(parent))),
                    None => {
                        warn!(index, parent = p, "snapshot node has no usable parent, dropping it");
                        None
                    }
                },
            };
            ids.push(id);
        }
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the first element whose attribute `name` equals `value`.
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|&id| self.attribute(id, name) == Some(value))
    }
}

fn split_element(element: SnapshotElement) -> (NodeKind, Vec<SnapshotChild>) {
    let SnapshotElement {
        tag,
        attributes,
        rect,
        style,
        hover_style,
        handlers,
        disabled,
        paint_order,
        children,
    } = element;

    let data = ElementData {
        tag: tag.to_lowercase(),
        attributes: attributes.into_iter().collect(),
        rect,
        style,
        hover_style,
        handlers,
        disabled,
        paint_order,
    };
    (NodeKind::Element(data), children)
}

impl Page for Document {
    fn document_element(&self) -> Option<NodeId> {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        let root = self.root?;
        self.children(root)
            .into_iter()
            .find(|&c| self.tag_name(c) == "body")
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| self.is_element(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.nodes[parent.0].children;
        let position = siblings.iter().position(|&s| s == node)?;
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|&s| self.is_element(s))
    }

    fn text_segments(&self, node: NodeId) -> Vec<&str> {
        let Some(n) = self.nodes.get(node.0) else {
            return vec![];
        };
        n.children
            .iter()
            .filter_map(|c| match &self.nodes[c.0].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element(_) => None,
            })
            .collect()
    }

    fn tag_name(&self, node: NodeId) -> &str {
        self.element(node).map(|e| e.tag.as_str()).unwrap_or("")
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.element(node)
            .map(|e| {
                e.attributes
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn bounding_box(&self, node: NodeId) -> Rect {
        self.element(node).map(|e| e.rect).unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId, pseudo: Option<PseudoState>) -> ComputedStyle {
        let Some(el) = self.element(node) else {
            return ComputedStyle::default();
        };

        match pseudo {
            None => el.style.clone(),
            Some(PseudoState::Hover) => {
                let mut style = el.style.clone();
                for (name, value) in &el.hover_style {
                    style.properties.insert(name.clone(), value.clone());
                }
                style
            }
        }
    }

    fn has_handler(&self, node: NodeId, event: &str) -> bool {
        self.element(node)
            .map(|e| e.handlers.iter().any(|h| h == event))
            .unwrap_or(false)
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).map(|e| e.disabled).unwrap_or(false)
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .filter_map(|id| self.element(id).map(|e| (id, e)))
            .filter(|(_, e)| {
                e.style.display() != "none"
                    && e.style.visibility() != "hidden"
                    && e.rect.has_area()
                    && e.rect.contains(x, y)
            })
            .max_by_key(|(id, e)| (e.paint_order, *id))
            .map(|(id, _)| id)
    }

    fn all_elements(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| self.is_element(id))
            .collect()
    }
}
