// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Comparison of measured statistics against golden values.

use log::warn;

use crate::stats::RunResult;
use crate::types::RunError;
use simbench_suite::Tolerance;

/// One statistic that fell outside tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct StatDiff {
    pub name: String,
    pub measured: f64,
    pub expected: f64,
}

/// The verdict for one run. `Fail` is an outcome, not an error: a
/// failing run never stops the rest of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass,
    Fail(Vec<StatDiff>),
    Error(RunError),
    Unverified,
}

/// Check each requested statistic against its golden value. A missing
/// golden entry leaves the run `Unverified`; measured statistics with
/// no golden counterpart are ignored.
#[must_use]
pub fn compare(
    result: &RunResult,
    expected: Option<&[f64]>,
    stats: &[String],
    tolerance: Tolerance,
) -> Outcome {
    let Some(expected) = expected else {
        return Outcome::Unverified;
    };
    if expected.len() != stats.len() {
        // A baseline recorded for a different statistic list cannot
        // verify this run.
        warn!(
            "golden row has {} values for {} requested statistics; leaving run unverified",
            expected.len(),
            stats.len()
        );
        return Outcome::Unverified;
    }

    let mut diffs = Vec::new();
    for (stat, &want) in stats.iter().zip(expected) {
        // Extraction guarantees every requested stat is present
        let Some(got) = result.get(stat) else {
            continue;
        };
        if !tolerance.accepts(got, want) {
            diffs.push(StatDiff {
                name: stat.clone(),
                measured: got,
                expected: want,
            });
        }
    }
    if diffs.is_empty() {
        Outcome::Pass
    } else {
        Outcome::Fail(diffs)
    }
}
