// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Regression runner: expands a suite into its run matrix, drives the
//! simulator, extracts statistics and checks them against a golden
//! table.
//!
//! Load-time problems (suite parse/config errors, version mismatch)
//! abort before anything runs. Run-time problems are recorded against
//! their run and the rest of the matrix still executes, so the final
//! report lists every requested run exactly once.

use log::info;

pub mod compare;
pub mod executor;
pub mod golden;
pub mod matrix;
pub mod report;
pub mod stats;
pub mod types;

pub use compare::{Outcome, StatDiff, compare};
pub use executor::{ProcessSimulator, Simulator, Version, check_version, run_matrix};
pub use golden::GoldenTable;
pub use matrix::{RunRequest, build_matrix};
pub use report::{RunReport, SuiteReport};
pub use stats::{RunResult, StatExtractor};
pub use types::RunError;

use simbench_suite::Suite;

/// Run a whole suite and produce its report.
///
/// With no golden table every run is `Unverified`; that is how fresh
/// baselines are recorded. `on_done` fires as each run finishes, from
/// worker threads.
pub fn run_suite<F>(
    simulator: &dyn Simulator,
    suite: &Suite,
    golden: Option<&GoldenTable>,
    jobs: usize,
    on_done: F,
) -> Result<SuiteReport, RunError>
where
    F: Fn(&RunRequest) + Sync,
{
    if let Some(min_version) = &suite.min_version {
        check_version(simulator, min_version)?;
    }

    let requests = build_matrix(suite);
    info!(
        "suite '{}': {} experiment(s) x {} benchmark(s) -> {} run(s)",
        suite.name,
        suite.experiments.len(),
        suite.benchmarks.len(),
        requests.len()
    );
    let outputs = run_matrix(simulator, &requests, jobs, on_done);

    let extractor = StatExtractor::new();
    let mut runs = Vec::with_capacity(requests.len());
    for (request, output) in requests.iter().zip(outputs) {
        let (outcome, measured) = match output {
            Ok(text) => {
                match extractor.extract(&text, &request.benchmark, &suite.stats, suite.stat_type) {
                    Ok(result) => {
                        let expected =
                            golden.and_then(|g| g.lookup(&request.experiment, &request.benchmark));
                        let outcome = compare(&result, expected, &suite.stats, suite.tolerance);
                        (outcome, Some(result))
                    }
                    Err(e) => (Outcome::Error(e), None),
                }
            }
            Err(e) => (Outcome::Error(e), None),
        };
        runs.push(RunReport {
            experiment: request.experiment.clone(),
            benchmark: request.benchmark.clone(),
            outcome,
            measured,
        });
    }

    Ok(SuiteReport {
        suite: suite.name.clone(),
        stats: suite.stats.clone(),
        runs,
    })
}
