use tracing::warn;

use crate::error::Result;
use crate::page::page_model::{NodeId, Page};

/// Which resolution primitive a locator string is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorFamily {
    HierarchicalPath,
    CssChain,
}

impl LocatorFamily {
    pub fn of(locator: &str) -> Self {
        if locator.starts_with('/') {
            LocatorFamily::HierarchicalPath
        } else {
            LocatorFamily::CssChain
        }
    }
}

/// Resolve a locator against the page, surfacing resolution faults.
pub fn try_resolve<P: Page + ?Sized>(page: &P, locator: &str) -> Result<Vec<NodeId>> {
    match LocatorFamily::of(locator) {
        LocatorFamily::HierarchicalPath => page.resolve_path(locator),
        LocatorFamily::CssChain => page.resolve_css(locator),
    }
}

/// Resolve a locator; a malformed locator degrades to an empty list.
pub fn resolve_locator<P: Page + ?Sized>(page: &P, locator: &str) -> Vec<NodeId> {
    match try_resolve(page, locator) {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!(locator, error = %e, "error processing locator");
            vec![]
        }
    }
}

/// True iff the CSS-like chain resolves to at least one node without a fault.
pub fn is_valid_locator<P: Page + ?Sized>(page: &P, locator: &str) -> bool {
    matches!(page.resolve_css(locator), Ok(nodes) if !nodes.is_empty())
}
