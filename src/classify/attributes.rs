use std::collections::BTreeMap;

use crate::page::page_model::{NodeId, Page};

/// Attributes that carry meaning for an agent choosing an element.
pub const RESERVED_ATTRIBUTES: [&str; 26] = [
    "accept",
    "alt",
    "aria-checked",
    "aria-current",
    "aria-label",
    "aria-required",
    "aria-role",
    "aria-selected",
    "checked",
    "class",
    "for",
    "href",
    "maxlength",
    "name",
    "pattern",
    "placeholder",
    "readonly",
    "required",
    "selected",
    "src",
    "text-value",
    "title",
    "type",
    "role",
    "value",
    // marks refined filter checkboxes on listing sites
    "facet-refined",
];

/// Whitelisted, non-empty attributes. The native `id` is surfaced as
/// `data-id` so it never collides with the hashed element id.
pub fn extract_attributes<P: Page + ?Sized>(page: &P, node: NodeId) -> BTreeMap<String, String> {
    let mut kept = BTreeMap::new();

    for (name, value) in page.attributes(node) {
        if value.is_empty() {
            continue;
        }
        if RESERVED_ATTRIBUTES.contains(&name) || name.starts_with("data-") {
            kept.insert(name.to_string(), value.to_string());
        } else if name == "id" {
            kept.insert("data-id".to_string(), value.to_string());
        }
    }

    kept
}
