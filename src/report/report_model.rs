use serde::Serialize;

use crate::bench::bench_model::BenchResult;

// ============================================================================
// Benchmark report: aggregates multiple BenchResult instances
// ============================================================================

/// Aggregated report for a run of locator comparisons.
///
/// Built from a `Vec<BenchResult>` via `from_results()`, consumed by the
/// console reporter or serialized as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub suite_name: String,

    /// Compared steps across all results
    pub total_steps: usize,

    pub passed_steps: usize,

    pub failed_steps: usize,

    pub skipped_steps: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub results: Vec<BenchResult>,
}

impl BenchReport {
    pub fn from_results(suite_name: &str, results: Vec<BenchResult>) -> Self {
        let total_steps = results.iter().map(|r| r.steps.len()).sum();
        let passed_steps = results
            .iter()
            .flat_map(|r| &r.steps)
            .filter(|s| s.passed)
            .count();
        let skipped_steps = results.iter().map(|r| r.skipped).sum();

        Self {
            suite_name: suite_name.to_string(),
            total_steps,
            passed_steps,
            failed_steps: total_steps - passed_steps,
            skipped_steps,
            duration_ms: None,
            results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed_steps == 0
    }
}
