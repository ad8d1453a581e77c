use serde::{Deserialize, Serialize};

use crate::page::page_model::{NodeId, Page};

/// How a style-hidden element relates to its visible descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityPolicy {
    /// Hidden styling is final. Otherwise the element is visible if its own
    /// box has area or any descendant is visible.
    #[default]
    StyleGated,

    /// An element is visible if it is styled visible with a nonzero box, or
    /// if any descendant is visible, even when the element itself is hidden.
    ChildrenOverride,
}

const INTERACTABLE_INPUT_TYPES: [&str; 20] = [
    "button",
    "checkbox",
    "date",
    "datetime-local",
    "email",
    "file",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

const INVALID_TAGS: [&str; 7] = ["script", "style", "link", "iframe", "meta", "noscript", "path"];

fn is_style_hidden<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    page.attribute(node, "aria-hidden") == Some("true")
        || page.computed_style(node, None).is_hidden()
}

/// Depth-first, stops at the first visible descendant.
pub fn is_visible<P: Page + ?Sized>(page: &P, node: NodeId, policy: VisibilityPolicy) -> bool {
    let hidden = is_style_hidden(page, node);
    let has_area = page.bounding_box(node).has_area();

    match policy {
        VisibilityPolicy::StyleGated => {
            if hidden {
                return false;
            }
            has_area || any_child_visible(page, node, policy)
        }
        VisibilityPolicy::ChildrenOverride => {
            (!hidden && has_area) || any_child_visible(page, node, policy)
        }
    }
}

fn any_child_visible<P: Page + ?Sized>(page: &P, node: NodeId, policy: VisibilityPolicy) -> bool {
    page.children(node)
        .into_iter()
        .any(|child| is_visible(page, child, policy))
}

/// `<input>` whose type (default `text`) is one of the interactable types.
pub fn is_input_interactable<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    if page.tag_name(node) != "input" {
        return false;
    }

    let input_type = page
        .attribute(node, "type")
        .unwrap_or("text")
        .trim()
        .to_lowercase();
    INTERACTABLE_INPUT_TYPES.contains(&input_type.as_str())
}

/// Whether an element belongs in the extracted tree.
///
/// Inputs are judged only by their type; everything else must not be an
/// excluded tag, must not be disabled and must be visible.
pub fn is_valid_element<P: Page + ?Sized>(page: &P, node: NodeId, policy: VisibilityPolicy) -> bool {
    let tag = page.tag_name(node);
    if tag == "input" {
        return is_input_interactable(page, node);
    }

    !INVALID_TAGS.contains(&tag)
        && page.attribute(node, "aria-disabled") != Some("true")
        && !page.is_disabled(node)
        && is_visible(page, node, policy)
}

/// Own text: trimmed, non-empty direct text nodes joined by single spaces.
/// Empty for elements that are not visible.
pub fn visible_text<P: Page + ?Sized>(page: &P, node: NodeId, policy: VisibilityPolicy) -> String {
    if !is_visible(page, node, policy) {
        return String::new();
    }

    page.text_segments(node)
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
