use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page::page_model::{NodeId, Page, PseudoState};

/// Interaction primitive an automation agent can apply to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Click,
    Hover,
    InputText,
    SelectOption,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Click => "click",
            Primitive::Hover => "hover",
            Primitive::InputText => "input_text",
            Primitive::SelectOption => "select_option",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SUPPORTED_PRIMITIVES_ATTRIBUTE: &str = "data-supported-primitives";

/// Zero-area or hidden elements cannot be interacted with.
fn is_rendered<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    page.bounding_box(node).has_area() && !page.computed_style(node, None).is_hidden()
}

fn has_pointer_cursor<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    matches!(page.computed_style(node, None).cursor(), "pointer" | "hand")
}

/// Walk `node` and its ancestors up to, not including, `<body>`. Returns on
/// the first node satisfying `test`.
fn any_in_chain<P, F>(page: &P, node: NodeId, mut test: F) -> bool
where
    P: Page + ?Sized,
    F: FnMut(NodeId) -> bool,
{
    let body = page.body();
    let mut current = Some(node);
    while let Some(el) = current {
        if Some(el) == body {
            break;
        }
        if test(el) {
            return true;
        }
        current = page.parent(el);
    }
    false
}

pub fn is_clickable<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    if !is_rendered(page, node) {
        return false;
    }

    let found = any_in_chain(page, node, |el| {
        page.has_handler(el, "click")
            || page.has_attribute(el, "onclick")
            || has_pointer_cursor(page, el)
            || page.has_attribute(el, "href")
    });

    found && !page.has_attribute(node, "disabled")
}

pub fn is_hoverable<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    if !is_rendered(page, node) {
        return false;
    }

    any_in_chain(page, node, |el| {
        if ["mouseover", "mouseenter"]
            .iter()
            .any(|event| page.has_handler(el, event))
            || page.has_attribute(el, "onmouseover")
            || page.has_attribute(el, "onmouseenter")
        {
            return true;
        }

        let base = page.computed_style(el, None);
        if matches!(base.cursor(), "pointer" | "hand") {
            return true;
        }

        let hover = page.computed_style(el, Some(PseudoState::Hover));
        !hover.is_empty() && !base.is_equivalent_to(&hover)
    })
}

pub fn can_input_text<P: Page + ?Sized>(page: &P, node: NodeId) -> bool {
    matches!(page.tag_name(node), "input" | "textarea") && !page.has_attribute(node, "readonly")
}

pub fn supported_primitives<P: Page + ?Sized>(page: &P, node: NodeId) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    if is_clickable(page, node) {
        primitives.push(Primitive::Click);
    }
    if is_hoverable(page, node) {
        primitives.push(Primitive::Hover);
    }
    if can_input_text(page, node) {
        primitives.push(Primitive::InputText);
    }
    if page.tag_name(node) == "select" {
        primitives.push(Primitive::SelectOption);
    }
    primitives
}

/// Comma-joined primitive names, the value of `data-supported-primitives`.
pub fn supported_primitives_value<P: Page + ?Sized>(page: &P, node: NodeId) -> String {
    supported_primitives(page, node)
        .iter()
        .map(Primitive::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
