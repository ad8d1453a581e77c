use std::path::Path;

use tracing::{info, warn};

use crate::bench::bench_model::{BenchOptions, BenchResult, EvalSchema, load_schema};
use crate::bench::runner::BenchRunner;
use crate::cli::config::AppConfig;
use crate::cli::config::PageSource;
use crate::error::LocatorError;
use crate::PageInspector;
use crate::matcher::locator_matcher::MatchOptions;
use crate::page::capture::capture_snapshot;
use crate::page::document::Document;
use crate::page::snapshot::load_snapshot;
use crate::report::console::format_console_report;
use crate::report::report_model::BenchReport;
use crate::tree::tree_model::ExtractOptions;

// ============================================================================
// Page loading
// ============================================================================

/// Load the page named by `--snapshot` or capture it from `--url`.
pub fn load_page(source: &PageSource, config: &AppConfig) -> Result<Document, Box<dyn std::error::Error>> {
    match (&source.snapshot, &source.url) {
        (Some(path), _) => Ok(load_snapshot(path)?),
        (None, Some(url)) => Ok(capture_snapshot(&config.capture.command(), url)?),
        (None, None) => Err("either --snapshot or --url is required".into()),
    }
}

// ============================================================================
// tree / ids subcommands
// ============================================================================

pub fn cmd_tree(
    source: &PageSource,
    options: &ExtractOptions,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(source, config)?;
    let inspector = PageInspector::new(&page).with_extract_options(*options);
    println!("{}", inspector.minify_html()?);
    Ok(())
}

pub fn cmd_ids(
    source: &PageSource,
    options: &ExtractOptions,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(source, config)?;
    let inspector = PageInspector::new(&page).with_extract_options(*options);
    println!("{}", inspector.element_id_locator_map_json()?);
    Ok(())
}

// ============================================================================
// compare / locate / validate subcommands
// ============================================================================

/// Print `0`, a distance, or `null`.
pub fn cmd_compare(
    source: &PageSource,
    locators_a: &[String],
    locators_b: &[String],
    options: &MatchOptions,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(source, config)?;
    let inspector = PageInspector::new(&page).with_match_options(*options);
    let distance = inspector.compare_locators(locators_a, locators_b);
    println!("{}", serde_json::to_string(&distance)?);
    Ok(())
}

/// Print the locator list for a coordinate; `[]` when nothing is there.
pub fn cmd_locate(
    source: &PageSource,
    x: f64,
    y: f64,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(source, config)?;
    let locators = match PageInspector::new(&page).locators_from_point(x, y) {
        Ok(locators) => locators,
        Err(LocatorError::NoElementAtPoint { .. }) => vec![],
        Err(e) => return Err(e.into()),
    };
    println!("{}", serde_json::to_string(&locators)?);
    Ok(())
}

/// Print `true`/`false`; returns the validity.
pub fn cmd_validate(
    source: &PageSource,
    locator: &str,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let page = load_page(source, config)?;
    let valid = PageInspector::new(&page).is_valid_locator(locator);
    println!("{}", valid);
    Ok(valid)
}

// ============================================================================
// bench subcommand
// ============================================================================

/// Run the benchmark and return whether every compared step passed.
///
/// A pair whose page cannot be loaded, or whose schemas name different URLs,
/// is logged and left out of the report.
pub fn cmd_bench(
    expected: &str,
    candidate: &str,
    snapshot: Option<&str>,
    options: &BenchOptions,
    format: &str,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let pairs = load_schema_pairs(expected, candidate)?;

    if pairs.is_empty() {
        warn!(expected, candidate, "no schema pairs found");
        return Ok(true);
    }

    let start = std::time::Instant::now();
    let mut results: Vec<BenchResult> = Vec::new();

    for (stem, exp, cand) in &pairs {
        let page = match load_bench_page(stem, &exp.url, snapshot, config) {
            Ok(page) => page,
            Err(e) => {
                warn!(schema = %stem, error = %e, "page unavailable, skipping schema pair");
                continue;
            }
        };

        match BenchRunner::run(exp, cand, &page, options) {
            Ok(result) => results.push(result),
            Err(e @ LocatorError::SchemaMismatch { .. }) => {
                warn!(schema = %stem, error = %e, "skipping schema pair");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let report = BenchReport::from_results("Locator Benchmark", results)
        .with_duration(start.elapsed().as_millis());
    let all_passed = report.all_passed();

    let output_content = match format {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

/// The page a schema pair is compared on: `<dir>/<stem>.json` for a snapshot
/// directory, the snapshot file itself, or a fresh capture of `url`.
fn load_bench_page(
    stem: &str,
    url: &str,
    snapshot: Option<&str>,
    config: &AppConfig,
) -> Result<Document, LocatorError> {
    match snapshot {
        Some(path) if Path::new(path).is_dir() => {
            let file = Path::new(path).join(format!("{}.json", stem));
            load_snapshot(&file.to_string_lossy())
        }
        Some(path) => load_snapshot(path),
        None => capture_snapshot(&config.capture.command(), url),
    }
}

/// Pair expected and candidate schemas.
///
/// Two files are paired directly. Two directories are paired by file name:
/// every expected `*.yaml`/`*.yml` with a same-named candidate file. Pairs
/// come back sorted by file stem.
pub fn load_schema_pairs(
    expected: &str,
    candidate: &str,
) -> Result<Vec<(String, EvalSchema, EvalSchema)>, Box<dyn std::error::Error>> {
    let expected_path = Path::new(expected);
    if !expected_path.is_dir() {
        let stem = file_stem(expected_path);
        return Ok(vec![(stem, load_schema(expected)?, load_schema(candidate)?)]);
    }

    let mut pairs = Vec::new();
    for entry in std::fs::read_dir(expected_path)? {
        let p = entry?.path();
        if !p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            continue;
        }
        let Some(name) = p.file_name() else { continue };
        let candidate_file = Path::new(candidate).join(name);
        if !candidate_file.exists() {
            info!(schema = %p.display(), "no candidate schema, skipping");
            continue;
        }
        pairs.push((
            file_stem(&p),
            load_schema(&p.to_string_lossy())?,
            load_schema(&candidate_file.to_string_lossy())?,
        ));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
