use std::collections::BTreeMap;

use crate::{
    error::Result,
    matcher::locator_matcher::{MatchDistance, MatchOptions, compare_locators},
    page::page_model::Page,
    query::resolve::is_valid_locator,
    selector::point::locators_from_point,
    tree::{
        builder::{build_page_tree, element_id_locator_map, element_id_locator_map_json, minify_html},
        tree_model::{ElementSpec, ExtractOptions},
    },
};

pub mod bench;
pub mod classify;
pub mod cli;
pub mod error;
pub mod identity;
pub mod matcher;
pub mod page;
pub mod query;
pub mod report;
pub mod selector;
pub mod tree;

/// Every whole-page operation, bound to one page and one set of options.
///
/// Holds no state besides its arguments: each call recomputes from the page
/// as it is at that moment.
pub struct PageInspector<'a, P: Page + ?Sized> {
    page: &'a P,
    extract: ExtractOptions,
    matcher: MatchOptions,
}

impl<'a, P: Page + ?Sized> PageInspector<'a, P> {
    pub fn new(page: &'a P) -> Self {
        Self {
            page,
            extract: ExtractOptions::default(),
            matcher: MatchOptions::default(),
        }
    }

    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    pub fn with_match_options(mut self, options: MatchOptions) -> Self {
        self.matcher = options;
        self
    }

    /// Pruned tree of the whole page; `None` if the document element is invalid.
    pub fn element_tree(&self) -> Option<ElementSpec> {
        build_page_tree(self.page, &self.extract)
    }

    /// `element_tree` as JSON (`null` for an invalid root).
    pub fn minify_html(&self) -> serde_json::Result<String> {
        minify_html(self.page, &self.extract)
    }

    pub fn element_id_locator_map(&self) -> BTreeMap<String, Vec<String>> {
        element_id_locator_map(self.page, &self.extract)
    }

    pub fn element_id_locator_map_json(&self) -> serde_json::Result<String> {
        element_id_locator_map_json(self.page, &self.extract)
    }

    pub fn compare_locators(&self, a: &[String], b: &[String]) -> MatchDistance {
        compare_locators(self.page, a, b, &self.matcher)
    }

    pub fn locators_from_point(&self, x: f64, y: f64) -> Result<Vec<String>> {
        locators_from_point(self.page, x, y)
    }

    pub fn is_valid_locator(&self, locator: &str) -> bool {
        is_valid_locator(self.page, locator)
    }
}
