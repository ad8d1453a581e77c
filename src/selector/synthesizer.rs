use serde::{Deserialize, Serialize};

use crate::page::page_model::{NodeId, Page};
use crate::query::css::nth_of_type;
use crate::selector::escape::css_escape;

/// Order in which the three candidate selectors are reported. The first one
/// feeds the identity hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorOrder {
    /// position-anchored, id-anchored, class-anchored
    #[default]
    PositionFirst,
    /// id-anchored, position-anchored, class-anchored
    IdFirst,
}

/// The three candidate selectors generated for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    pub position: String,
    pub id: String,
    pub class: String,
}

impl SelectorSet {
    pub fn ordered(&self, order: SelectorOrder) -> Vec<String> {
        match order {
            SelectorOrder::PositionFirst => {
                vec![self.position.clone(), self.id.clone(), self.class.clone()]
            }
            SelectorOrder::IdFirst => {
                vec![self.id.clone(), self.position.clone(), self.class.clone()]
            }
        }
    }

    /// The selector identity is derived from.
    pub fn canonical(&self, order: SelectorOrder) -> &str {
        match order {
            SelectorOrder::PositionFirst => &self.position,
            SelectorOrder::IdFirst => &self.id,
        }
    }
}

pub fn generate_css_selectors<P: Page + ?Sized>(page: &P, node: NodeId) -> SelectorSet {
    SelectorSet {
        position: nth_of_type_selector(page, node),
        id: id_selector(page, node),
        class: class_selector(page, node),
    }
}

/// Candidate selectors in the requested order.
pub fn css_selectors<P: Page + ?Sized>(page: &P, node: NodeId, order: SelectorOrder) -> Vec<String> {
    generate_css_selectors(page, node).ordered(order)
}

/// Build `a > b > c` from the root down to `node`, one segment per level.
/// `segment` returns the segment and whether to stop climbing.
fn build_path<P, F>(page: &P, node: NodeId, mut segment: F) -> String
where
    P: Page + ?Sized,
    F: FnMut(NodeId) -> (String, bool),
{
    let mut path = Vec::new();
    let mut current = Some(node);
    while let Some(el) = current {
        let (seg, stop) = segment(el);
        path.push(seg);
        if stop {
            break;
        }
        current = page.parent(el);
    }
    path.reverse();
    path.join(" > ")
}

/// Climbs until an ancestor with an id, which ends the path.
pub fn id_selector<P: Page + ?Sized>(page: &P, node: NodeId) -> String {
    build_path(page, node, |el| {
        let tag = page.tag_name(el);
        match page.attribute(el, "id").filter(|id| !id.is_empty()) {
            Some(id) => (format!("{}#{}", tag, css_escape(id)), true),
            None => (tag.to_string(), false),
        }
    })
}

pub fn nth_of_type_selector<P: Page + ?Sized>(page: &P, node: NodeId) -> String {
    build_path(page, node, |el| {
        let tag = page.tag_name(el);
        let nth = nth_of_type(page, el);
        if nth == 1 {
            (tag.to_string(), false)
        } else {
            (format!("{}:nth-of-type({})", tag, nth), false)
        }
    })
}

pub fn class_selector<P: Page + ?Sized>(page: &P, node: NodeId) -> String {
    build_path(page, node, |el| {
        let classes: String = page
            .attribute(el, "class")
            .unwrap_or("")
            .split_whitespace()
            .map(|c| format!(".{}", css_escape(c)))
            .collect();
        (format!("{}{}", page.tag_name(el), classes), false)
    })
}
