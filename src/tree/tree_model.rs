use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::visibility::VisibilityPolicy;
use crate::selector::synthesizer::SelectorOrder;

/// A node of the extracted tree.
///
/// Only elements that pass validity appear; an invalid element takes its
/// whole subtree with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag_name: String,

    /// Identity token hashed from the canonical selector
    pub id: String,

    pub attributes: BTreeMap<String, String>,

    /// Own visible text, never a descendant's
    pub text: String,

    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ElementSpec::node_count).sum::<usize>()
    }

    /// Depth-first search for the node carrying identity `id`.
    pub fn find(&self, id: &str) -> Option<&ElementSpec> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Pre-order iterator over the subtree.
    pub fn iter(&self) -> impl Iterator<Item = &ElementSpec> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Switches between the two historical extraction behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    #[serde(default)]
    pub visibility: VisibilityPolicy,

    #[serde(default)]
    pub selector_order: SelectorOrder,
}
