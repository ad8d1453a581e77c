use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::page::page_model::{NodeId, Page};
use crate::query::resolve::resolve_locator;

/// Outcome of reconciling two locator sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchDistance {
    /// Both sets resolve to the very same element
    Exact,
    /// Elements within the hop budget of each other; pixel distance between
    /// their box centers
    Near(f64),
    /// No pair of resolved elements is related
    Unrelated,
}

impl MatchDistance {
    /// `Some(0.0)`, `Some(distance)` or `None`.
    pub fn value(&self) -> Option<f64> {
        match self {
            MatchDistance::Exact => Some(0.0),
            MatchDistance::Near(d) => Some(*d),
            MatchDistance::Unrelated => None,
        }
    }

    pub fn is_related(&self) -> bool {
        !matches!(self, MatchDistance::Unrelated)
    }
}

/// Serialized as `0`, a float, or `null`.
impl Serialize for MatchDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MatchDistance::Exact => serializer.serialize_u8(0),
            MatchDistance::Near(d) => serializer.serialize_f64(*d),
            MatchDistance::Unrelated => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Ancestor steps walked when testing hierarchy proximity
    #[serde(default = "default_hop_budget")]
    pub hop_budget: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            hop_budget: default_hop_budget(),
        }
    }
}

fn default_hop_budget() -> usize {
    2
}

/// Decide whether two locator sets identify the same element.
///
/// Greedy and order-sensitive: pairs are visited with `a` outer and `b`
/// inner, and the first identical or nearby pair decides the result.
pub fn compare_locators<P: Page + ?Sized>(
    page: &P,
    a: &[String],
    b: &[String],
    options: &MatchOptions,
) -> MatchDistance {
    let resolved_b: Vec<(&String, Vec<NodeId>)> =
        b.iter().map(|loc| (loc, resolve_locator(page, loc))).collect();

    for loc_a in a {
        let nodes_a = resolve_locator(page, loc_a);
        for (loc_b, nodes_b) in &resolved_b {
            for &el_a in &nodes_a {
                for &el_b in nodes_b {
                    if el_a == el_b {
                        debug!(a = %loc_a, b = %loc_b, "exact match");
                        return MatchDistance::Exact;
                    }
                    if are_close_in_hierarchy(page, el_a, el_b, options.hop_budget) {
                        let distance = center_distance(page, el_a, el_b);
                        debug!(a = %loc_a, b = %loc_b, distance, "close match");
                        return MatchDistance::Near(distance);
                    }
                }
            }
        }
    }

    debug!("no match found");
    MatchDistance::Unrelated
}

/// Walk both ancestor chains in lock-step for `hop_budget` steps, checking at
/// each step whether either side has reached the other starting node. A
/// chain that reaches the root stays there.
pub fn are_close_in_hierarchy<P: Page + ?Sized>(
    page: &P,
    a: NodeId,
    b: NodeId,
    hop_budget: usize,
) -> bool {
    let (mut pa, mut pb) = (a, b);
    for _ in 0..=hop_budget {
        if pa == b || pb == a {
            return true;
        }
        if let Some(parent) = page.parent(pa) {
            pa = parent;
        }
        if let Some(parent) = page.parent(pb) {
            pb = parent;
        }
    }
    false
}

/// Euclidean distance between the centers of the two bounding boxes.
pub fn center_distance<P: Page + ?Sized>(page: &P, a: NodeId, b: NodeId) -> f64 {
    let (ax, ay) = page.bounding_box(a).center();
    let (bx, by) = page.bounding_box(b).center();
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}
