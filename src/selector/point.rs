use tracing::warn;

use crate::error::{LocatorError, Result};
use crate::page::page_model::{NodeId, Page};
use crate::query::css::nth_of_type;

/// Absolute hierarchical path from the root to `node`, e.g.
/// `/html/body/div[2]/a`. The index is omitted when it is 1.
pub fn absolute_path<P: Page + ?Sized>(page: &P, node: NodeId) -> String {
    let mut parts = Vec::new();
    let mut current = Some(node);
    while let Some(el) = current {
        let tag = page.tag_name(el);
        let index = nth_of_type(page, el);
        parts.push(if index > 1 {
            format!("{}[{}]", tag, index)
        } else {
            tag.to_string()
        });
        current = page.parent(el);
    }
    parts.reverse();
    format!("/{}", parts.join("/"))
}

/// Locators for the topmost element under a page coordinate.
///
/// Returns a single absolute path, or `NoElementAtPoint` when nothing is
/// rendered there.
pub fn locators_from_point<P: Page + ?Sized>(page: &P, x: f64, y: f64) -> Result<Vec<String>> {
    match page.element_from_point(x, y) {
        Some(node) => Ok(vec![absolute_path(page, node)]),
        None => {
            warn!(x, y, "no element at location");
            Err(LocatorError::NoElementAtPoint { x, y })
        }
    }
}
