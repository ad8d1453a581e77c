use element_identity::PageInspector;
use element_identity::matcher::locator_matcher::{
    MatchDistance, MatchOptions, are_close_in_hierarchy, center_distance, compare_locators,
};
use element_identity::query::css::query_all;

use crate::common::fixtures::{list_page, node};

mod common;

const SECOND_ITEM: &str = "html > body > ul > li:nth-of-type(2)";

fn locators(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn compare(a: &[&str], b: &[&str]) -> MatchDistance {
    let doc = list_page();
    compare_locators(&doc, &locators(a), &locators(b), &MatchOptions::default())
}

// ============================================================================
// Distance outcomes
// ============================================================================

#[test]
fn same_element_is_exact() {
    assert_eq!(compare(&[SECOND_ITEM], &[SECOND_ITEM]), MatchDistance::Exact);
}

#[test]
fn different_locators_for_same_element_are_exact() {
    assert_eq!(compare(&["div#x > a"], &["/html/body/div/a"]), MatchDistance::Exact);
    assert_eq!(compare(&[SECOND_ITEM], &["/html/body/ul/li[2]"]), MatchDistance::Exact);
}

#[test]
fn text_and_negation_locators_resolve() {
    assert_eq!(compare(&["//a[text()='Home']"], &["div#x > a"]), MatchDistance::Exact);
    assert_eq!(compare(&["//li[contains(text(), 'Tw')]"], &[SECOND_ITEM]), MatchDistance::Exact);
    assert_eq!(compare(&["input:not([type~=hidden])"], &["input[name=q]"]), MatchDistance::Exact);
}

#[test]
fn parent_and_child_are_near() {
    // div#x is centered at (400, 25), the link at (60, 25)
    assert_eq!(compare(&["div#x"], &["div#x > a"]), MatchDistance::Near(340.0));
    assert_eq!(compare(&["div#x > a"], &["div#x"]), MatchDistance::Near(340.0));
}

#[test]
fn siblings_are_unrelated() {
    assert_eq!(
        compare(&["html > body > ul > li"], &[SECOND_ITEM]),
        MatchDistance::Unrelated
    );
}

#[test]
fn distant_elements_are_unrelated() {
    assert_eq!(compare(&[SECOND_ITEM], &["div#x > a"]), MatchDistance::Unrelated);
}

#[test]
fn empty_or_unresolvable_sets_are_unrelated() {
    assert_eq!(compare(&[], &[SECOND_ITEM]), MatchDistance::Unrelated);
    assert_eq!(compare(&[SECOND_ITEM], &[]), MatchDistance::Unrelated);
    assert_eq!(compare(&["section"], &["section"]), MatchDistance::Unrelated);
}

#[test]
fn malformed_locator_does_not_abort_comparison() {
    assert_eq!(
        compare(&["div[", SECOND_ITEM], &["/html/[", "/html/body/ul/li[2]"]),
        MatchDistance::Exact
    );
}

#[test]
fn multi_match_locators_compare_every_element() {
    // `li` resolves to all three items; the third one matches.
    assert_eq!(
        compare(&["li"], &["html > body > ul > li:nth-of-type(3)"]),
        MatchDistance::Exact
    );
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn first_matching_pair_wins() {
    // a[0] vs b[0] is unrelated, a[0] vs b[1] is exact
    assert_eq!(
        compare(&[SECOND_ITEM, "div#x"], &["div#x > a", SECOND_ITEM]),
        MatchDistance::Exact
    );
    // a[0] vs b[0] is already near, so the exact pair is never reached
    assert_eq!(
        compare(&["div#x", SECOND_ITEM], &["div#x > a", SECOND_ITEM]),
        MatchDistance::Near(340.0)
    );
}

// ============================================================================
// Hierarchy proximity
// ============================================================================

#[test]
fn hop_budget_bounds_ancestor_walk() {
    let doc = list_page();
    let item = query_all(&doc, "li").unwrap()[1];
    let body = node(&doc, "body");

    assert!(are_close_in_hierarchy(&doc, item, body, 2));
    assert!(!are_close_in_hierarchy(&doc, item, body, 1));
    assert!(are_close_in_hierarchy(&doc, body, item, 2), "symmetric");
    assert!(are_close_in_hierarchy(&doc, item, item, 0));
}

#[test]
fn hop_budget_is_configurable() {
    let doc = list_page();
    let a = locators(&[SECOND_ITEM]);
    let b = locators(&["body"]);

    let tight = MatchOptions { hop_budget: 1 };
    assert_eq!(compare_locators(&doc, &a, &b, &tight), MatchDistance::Unrelated);

    // item centered at (400, 105), body at (400, 300)
    let loose = MatchOptions::default();
    assert_eq!(compare_locators(&doc, &a, &b, &loose), MatchDistance::Near(195.0));
}

#[test]
fn root_chain_stays_at_root() {
    let doc = list_page();
    let html = node(&doc, "html");
    let a = node(&doc, "a");
    // html is three steps above the link
    assert!(!are_close_in_hierarchy(&doc, html, a, 2));
    assert!(are_close_in_hierarchy(&doc, html, a, 3));
}

#[test]
fn center_distance_is_euclidean() {
    let doc = list_page();
    let a = node(&doc, "a");
    let item = query_all(&doc, "li").unwrap()[0];
    // (60, 25) to (400, 75)
    let expected = (340.0f64.powi(2) + 50.0f64.powi(2)).sqrt();
    assert!((center_distance(&doc, a, item) - expected).abs() < 1e-9);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn distance_serializes_as_number_or_null() {
    assert_eq!(serde_json::to_string(&MatchDistance::Exact).unwrap(), "0");
    assert_eq!(serde_json::to_string(&MatchDistance::Near(12.5)).unwrap(), "12.5");
    assert_eq!(serde_json::to_string(&MatchDistance::Unrelated).unwrap(), "null");
}

#[test]
fn distance_value_and_relation() {
    assert_eq!(MatchDistance::Exact.value(), Some(0.0));
    assert_eq!(MatchDistance::Near(3.0).value(), Some(3.0));
    assert_eq!(MatchDistance::Unrelated.value(), None);
    assert!(MatchDistance::Near(3.0).is_related());
    assert!(!MatchDistance::Unrelated.is_related());
}

#[test]
fn inspector_uses_bound_match_options() {
    let doc = list_page();
    let inspector = PageInspector::new(&doc).with_match_options(MatchOptions { hop_budget: 1 });
    let a = locators(&[SECOND_ITEM]);
    assert_eq!(
        inspector.compare_locators(&a, &locators(&["body"])),
        MatchDistance::Unrelated
    );
    assert_eq!(inspector.compare_locators(&a, &a), MatchDistance::Exact);
    assert_eq!(
        inspector.locators_from_point(400.0, 100.0).unwrap(),
        vec!["/html/body/ul/li[2]"]
    );
}
