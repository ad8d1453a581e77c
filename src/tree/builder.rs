use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::classify::attributes::extract_attributes;
use crate::classify::capability::{SUPPORTED_PRIMITIVES_ATTRIBUTE, supported_primitives_value};
use crate::classify::visibility::{is_valid_element, visible_text};
use crate::identity::hasher::element_identity;
use crate::page::page_model::{NodeId, Page};
use crate::selector::synthesizer::generate_css_selectors;
use crate::tree::tree_model::{ElementSpec, ExtractOptions};

/// Build the pruned tree rooted at `root`.
///
/// Returns `None` when `root` itself is invalid, regardless of what lies
/// beneath it.
pub fn build_element_tree<P: Page + ?Sized>(
    page: &P,
    root: NodeId,
    options: &ExtractOptions,
) -> Option<ElementSpec> {
    if !is_valid_element(page, root, options.visibility) {
        return None;
    }

    let mut attributes = extract_attributes(page, root);
    attributes.insert(
        SUPPORTED_PRIMITIVES_ATTRIBUTE.to_string(),
        supported_primitives_value(page, root),
    );

    let selectors = generate_css_selectors(page, root);
    let id = element_identity(selectors.canonical(options.selector_order));

    let children = page
        .children(root)
        .into_iter()
        .filter_map(|child| build_element_tree(page, child, options))
        .collect();

    Some(ElementSpec {
        tag_name: page.tag_name(root).to_string(),
        id,
        attributes,
        text: visible_text(page, root, options.visibility),
        children,
    })
}

/// Tree of the whole page, rooted at the document element.
pub fn build_page_tree<P: Page + ?Sized>(page: &P, options: &ExtractOptions) -> Option<ElementSpec> {
    let Some(root) = page.document_element() else {
        warn!("page has no document element");
        return None;
    };

    let tree = build_element_tree(page, root, options);
    if tree.is_none() {
        warn!("document element is not valid, tree is empty");
    }
    tree
}

/// Whole-page tree serialized as JSON; the literal `null` for an invalid root.
pub fn minify_html<P: Page + ?Sized>(page: &P, options: &ExtractOptions) -> serde_json::Result<String> {
    serde_json::to_string(&build_page_tree(page, options))
}

/// Identity token to candidate selectors, for every element of the page
/// (valid or not). A later element overwrites an earlier one on collision.
pub fn element_id_locator_map<P: Page + ?Sized>(
    page: &P,
    options: &ExtractOptions,
) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();

    for node in page.all_elements() {
        let selectors = generate_css_selectors(page, node);
        let id = element_identity(selectors.canonical(options.selector_order));
        if let Some(previous) = map.insert(id.clone(), selectors.ordered(options.selector_order)) {
            debug!(id = %id, previous = %previous[0], "identity collision, keeping later element");
        }
    }

    map
}

/// `element_id_locator_map` pretty-printed with 2-space indentation.
pub fn element_id_locator_map_json<P: Page + ?Sized>(
    page: &P,
    options: &ExtractOptions,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&element_id_locator_map(page, options))
}
