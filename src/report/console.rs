use crate::matcher::locator_matcher::MatchDistance;
use crate::report::report_model::BenchReport;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a benchmark report for terminal output.
///
/// Produces output like:
/// ```text
/// === Locator Benchmark ===
///
/// shop (2 compared, 1 skipped)
///   ✓ PASS  [0] search box — exact
///   ✗ FAIL  [2] checkout button — no relation
///
/// === Results: 1 passed, 1 failed, 1 skipped (2 compared) ===
/// ```
pub fn format_console_report(report: &BenchReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n\n", report.suite_name));

    for result in &report.results {
        out.push_str(&format!(
            "{} ({} compared, {} skipped)\n",
            result.name,
            result.steps.len(),
            result.skipped
        ));

        for step in &result.steps {
            let marker = if step.passed {
                "\u{2713} PASS"
            } else {
                "\u{2717} FAIL"
            };
            out.push_str(&format!(
                "  {}  [{}] {} — {}\n",
                marker,
                step.step_index,
                step.user_request,
                describe_distance(&step.distance)
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} skipped ({} compared)",
        report.passed_steps, report.failed_steps, report.skipped_steps, report.total_steps
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

fn describe_distance(distance: &MatchDistance) -> String {
    match distance {
        MatchDistance::Exact => "exact".to_string(),
        MatchDistance::Near(d) => format!("near, {:.1}px", d),
        MatchDistance::Unrelated => "no relation".to_string(),
    }
}
