use tracing::info;

use crate::bench::bench_model::{BenchOptions, BenchResult, EvalSchema, StepResult};
use crate::error::{LocatorError, Result};
use crate::matcher::locator_matcher::{MatchDistance, compare_locators};
use crate::page::page_model::Page;

/// Compares candidate locators against expected ones on a live page.
pub struct BenchRunner;

impl BenchRunner {
    /// Compare `candidate` against `expected`, step by step.
    ///
    /// Steps are paired by position; a pair whose user requests differ is
    /// skipped. Schemas recorded for different URLs are rejected.
    pub fn run<P: Page + ?Sized>(
        expected: &EvalSchema,
        candidate: &EvalSchema,
        page: &P,
        options: &BenchOptions,
    ) -> Result<BenchResult> {
        if expected.url != candidate.url {
            return Err(LocatorError::SchemaMismatch {
                expected: expected.url.clone(),
                candidate: candidate.url.clone(),
            });
        }

        let mut steps = Vec::new();
        let mut skipped = 0;

        for (i, (exp, cand)) in expected.steps.iter().zip(&candidate.steps).enumerate() {
            if exp.user_request != cand.user_request {
                info!(step = i, "user requests differ, skipping step");
                skipped += 1;
                continue;
            }

            let distance = compare_locators(page, &exp.locators, &cand.locators, &options.matcher);
            let passed = Self::step_passes(distance, options.max_distance);
            info!(step = i, request = %exp.user_request, ?distance, passed, "compared step");

            steps.push(StepResult {
                step_index: i,
                user_request: exp.user_request.clone(),
                distance,
                passed,
            });
        }

        Ok(BenchResult {
            name: expected.display_name().to_string(),
            url: expected.url.clone(),
            passed: steps.iter().all(|s| s.passed),
            steps,
            skipped,
        })
    }

    fn step_passes(distance: MatchDistance, max_distance: Option<f64>) -> bool {
        distance
            .value()
            .is_some_and(|d| max_distance.is_none_or(|max| d <= max))
    }
}
