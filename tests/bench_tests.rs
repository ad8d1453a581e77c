use element_identity::bench::bench_model::{BenchOptions, EvalSchema, load_schema};
use element_identity::bench::runner::BenchRunner;
use element_identity::error::LocatorError;
use element_identity::matcher::locator_matcher::MatchDistance;

use crate::common::fixtures::{fixture_path, list_page};

mod common;

const EXPECTED: &str = r#"
url: https://shop.example/
steps:
  - userRequest: second item
    locatrs:
      - "html > body > ul > li:nth-of-type(2)"
  - userRequest: home link
    locatrs: ["div#x > a"]
  - userRequest: header
    locatrs: ["div#x"]
  - userRequest: search box
    locatrs: ["input[name=q]"]
"#;

const CANDIDATE: &str = r#"
url: https://shop.example/
steps:
  - userRequest: second item
    locatrs: ["/html/body/ul/li[2]"]
  - userRequest: home link
    locatrs: ["div#x"]
  - userRequest: the header
    locatrs: ["div#x"]
  - userRequest: search box
    locatrs: ["li", "div["]
  - userRequest: extra step
    locatrs: ["body"]
"#;

// ============================================================================
// Schema parsing
// ============================================================================

#[test]
fn schema_accepts_recorded_field_names() {
    let schema = EvalSchema::from_yaml(EXPECTED).unwrap();
    assert_eq!(schema.url, "https://shop.example/");
    assert_eq!(schema.steps.len(), 4);
    assert_eq!(schema.steps[0].user_request, "second item");
    assert_eq!(schema.steps[0].locators, vec!["html > body > ul > li:nth-of-type(2)"]);
    assert_eq!(schema.display_name(), "https://shop.example/");
}

#[test]
fn schema_accepts_snake_case_field_names() {
    let yaml = r#"
name: Shop
url: https://shop.example/
steps:
  - user_request: cart
    locators: ["a.cart"]
  - user_request: no locators recorded
"#;
    let schema = EvalSchema::from_yaml(yaml).unwrap();
    assert_eq!(schema.display_name(), "Shop");
    assert_eq!(schema.steps[0].locators, vec!["a.cart"]);
    assert!(schema.steps[1].locators.is_empty());
}

#[test]
fn schema_without_url_is_rejected() {
    let err = EvalSchema::from_yaml("steps: []").unwrap_err();
    assert!(matches!(err, LocatorError::Yaml { .. }), "got {:?}", err);
}

#[test]
fn missing_schema_file_is_io_error() {
    let err = load_schema(&fixture_path("missing.yaml")).unwrap_err();
    assert!(matches!(err, LocatorError::Io { .. }), "got {:?}", err);
}

// ============================================================================
// Runner
// ============================================================================

#[test]
fn runner_compares_paired_steps() {
    let doc = list_page();
    let expected = EvalSchema::from_yaml(EXPECTED).unwrap();
    let candidate = EvalSchema::from_yaml(CANDIDATE).unwrap();

    let result = BenchRunner::run(&expected, &candidate, &doc, &BenchOptions::default()).unwrap();

    assert_eq!(result.url, "https://shop.example/");
    assert_eq!(result.skipped, 1, "the header step has a different request");
    assert_eq!(result.steps.len(), 3, "the extra candidate step is ignored");

    assert_eq!(result.steps[0].step_index, 0);
    assert_eq!(result.steps[0].distance, MatchDistance::Exact);
    assert!(result.steps[0].passed);

    assert_eq!(result.steps[1].step_index, 1);
    assert_eq!(result.steps[1].distance, MatchDistance::Near(340.0));
    assert!(result.steps[1].passed, "any related pair passes without a limit");

    assert_eq!(result.steps[2].step_index, 3);
    assert_eq!(result.steps[2].user_request, "search box");
    assert_eq!(result.steps[2].distance, MatchDistance::Unrelated);
    assert!(!result.steps[2].passed);

    assert!(!result.passed);
}

#[test]
fn max_distance_limits_near_matches() {
    let doc = list_page();
    let expected = EvalSchema::from_yaml(EXPECTED).unwrap();
    let candidate = EvalSchema::from_yaml(CANDIDATE).unwrap();
    let options = BenchOptions {
        max_distance: Some(100.0),
        ..BenchOptions::default()
    };

    let result = BenchRunner::run(&expected, &candidate, &doc, &options).unwrap();
    assert!(result.steps[0].passed, "exact always passes");
    assert!(!result.steps[1].passed, "340px is over the limit");
}

#[test]
fn identical_schemas_pass() {
    let doc = list_page();
    let expected = EvalSchema::from_yaml(EXPECTED).unwrap();

    let result = BenchRunner::run(&expected, &expected, &doc, &BenchOptions::default()).unwrap();
    assert!(result.passed);
    assert_eq!(result.skipped, 0);
    assert!(result.steps.iter().all(|s| s.distance == MatchDistance::Exact));
}

#[test]
fn different_urls_are_a_schema_mismatch() {
    let doc = list_page();
    let expected = EvalSchema::from_yaml(EXPECTED).unwrap();
    let mut candidate = EvalSchema::from_yaml(CANDIDATE).unwrap();
    candidate.url = "https://other.example/".into();

    let err = BenchRunner::run(&expected, &candidate, &doc, &BenchOptions::default()).unwrap_err();
    match err {
        LocatorError::SchemaMismatch { expected, candidate } => {
            assert_eq!(expected, "https://shop.example/");
            assert_eq!(candidate, "https://other.example/");
        }
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
}
