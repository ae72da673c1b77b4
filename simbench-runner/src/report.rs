// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The per-suite regression report.

use std::fmt;

use itertools::Itertools;

use crate::compare::Outcome;
use crate::stats::RunResult;

/// One row of the report: the verdict for one matrix cell.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub experiment: String,
    pub benchmark: String,
    pub outcome: Outcome,
    /// Present whenever extraction succeeded, even for failing runs.
    pub measured: Option<RunResult>,
}

/// Verdicts for every requested run, exactly once each, in
/// suite-definition order.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub suite: String,
    pub stats: Vec<String>,
    pub runs: Vec<RunReport>,
}

impl SuiteReport {
    #[must_use]
    pub fn num_passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Pass))
    }

    #[must_use]
    pub fn num_failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Fail(_)))
    }

    #[must_use]
    pub fn num_errored(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Error(_)))
    }

    #[must_use]
    pub fn num_unverified(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unverified))
    }

    /// True when no run failed or errored (unverified runs are not
    /// regressions).
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.num_failed() == 0 && self.num_errored() == 0
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.runs.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Render the measured values in the golden-table format, so a
    /// report from a trusted simulator revision can be recorded as the
    /// next baseline. Runs with no measurements become comment lines.
    #[must_use]
    pub fn to_golden_string(&self) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;
        for run in &self.runs {
            if current != Some(run.experiment.as_str()) {
                out.push_str(&format!("# {}:\n", run.experiment));
                current = Some(run.experiment.as_str());
            }
            match &run.measured {
                Some(result) => {
                    let row = result.values().iter().map(|(_, v)| format!("{v:.6}")).join(",");
                    out.push_str(&format!("{},{row}\n", run.benchmark));
                }
                None => {
                    out.push_str(&format!("# {}: no measurements\n", run.benchmark));
                }
            }
        }
        out
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "suite {}:", self.suite)?;
        for run in &self.runs {
            let id = format!("{}/{}", run.experiment, run.benchmark);
            match &run.outcome {
                Outcome::Pass => writeln!(f, "  {id}: pass")?,
                Outcome::Fail(diffs) => {
                    let detail = diffs
                        .iter()
                        .map(|d| {
                            format!("{}: measured {:.6}, expected {:.6}", d.name, d.measured, d.expected)
                        })
                        .join("; ");
                    writeln!(f, "  {id}: FAIL ({detail})")?;
                }
                Outcome::Error(e) => writeln!(f, "  {id}: ERROR ({e})")?,
                Outcome::Unverified => writeln!(f, "  {id}: unverified")?,
            }
        }
        write!(
            f,
            "{} runs: {} passed, {} failed, {} errored, {} unverified",
            self.runs.len(),
            self.num_passed(),
            self.num_failed(),
            self.num_errored(),
            self.num_unverified()
        )
    }
}
