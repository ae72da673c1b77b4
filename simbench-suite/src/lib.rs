// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Suite definitions for simulator regression runs.
//!
//! A suite pairs an ordered list of experiments (simulator-level
//! settings) with an ordered list of benchmarks (workload-level
//! settings), names the statistics to collect, and carries the
//! comparison tolerance and minimum simulator version. Suites load
//! from YAML files or are assembled in code with [SuiteBuilder].

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::path::Path;

use log::debug;
use serde::Deserialize;

pub mod types;

pub use types::{
    BenchmarkConfig, BenchmarkSection, ClassSpec, ExperimentConfig, PerClass, StatType, Tolerance,
};

/// Build a [ConfigError] result from format arguments
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        Err($crate::ConfigError(format!($($arg)*)))
    };
}

/// Error raised for an invalid suite or benchmark declaration. Fatal
/// to suite load.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Suite config error: {}", self.0)
    }
}

impl Error for ConfigError {}

/// Raw suite file contents.
#[derive(Debug, Deserialize)]
struct SuiteSection {
    name: String,
    min_version: Option<String>,
    #[serde(default)]
    tolerance: Option<Tolerance>,
    stats: Vec<String>,
    statype: Option<StatType>,
    experiments: Vec<ExperimentConfig>,
    benchmarks: Vec<BenchmarkSection>,
    /// Optional partial-matrix restriction: experiment name to the
    /// benchmark names it runs. Unlisted experiments run everything.
    restrict: Option<HashMap<String, Vec<String>>>,
}

/// A validated regression suite.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub min_version: Option<String>,
    pub tolerance: Tolerance,
    pub stats: Vec<String>,
    pub stat_type: StatType,
    pub experiments: Vec<ExperimentConfig>,
    pub benchmarks: Vec<BenchmarkConfig>,
    restrict: HashMap<String, Vec<String>>,
}

impl Suite {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("Unable to read {}: {e}", path.display())))?;
        Self::from_string(&s)
    }

    pub fn from_string(suite_str: &str) -> Result<Self, ConfigError> {
        let section: SuiteSection = serde_yaml::from_str(suite_str)
            .map_err(|e| ConfigError(format!("serde_yaml::from_str failed: {e}")))?;

        let mut builder = SuiteBuilder::new(&section.name)
            .stats(section.stats.iter().map(String::as_str))
            .stat_type(section.statype.unwrap_or_default());
        if let Some(version) = &section.min_version {
            builder = builder.min_version(version);
        }
        if let Some(tolerance) = section.tolerance {
            builder = builder.tolerance(tolerance);
        }
        for experiment in section.experiments {
            builder = builder.experiment(experiment);
        }
        for benchmark in section.benchmarks {
            builder = builder.benchmark(benchmark);
        }
        if let Some(restrict) = section.restrict {
            for (experiment, benchmarks) in restrict {
                builder = builder.restrict(&experiment, benchmarks);
            }
        }
        let suite = builder.build()?;
        debug!(
            "suite '{}': {} experiment(s), {} benchmark(s), {} statistic(s)",
            suite.name,
            suite.experiments.len(),
            suite.benchmarks.len(),
            suite.stats.len()
        );
        Ok(suite)
    }

    /// The benchmarks a given experiment runs, in declaration order,
    /// honouring any partial-matrix restriction.
    #[must_use]
    pub fn benchmarks_for(&self, experiment: &str) -> Vec<&BenchmarkConfig> {
        match self.restrict.get(experiment) {
            Some(allowed) => self
                .benchmarks
                .iter()
                .filter(|b| allowed.contains(&b.name))
                .collect(),
            None => self.benchmarks.iter().collect(),
        }
    }
}

/// Assembles a [Suite], expanding benchmarks and validating the whole
/// definition in [build](SuiteBuilder::build).
#[derive(Debug, Default)]
pub struct SuiteBuilder {
    name: String,
    min_version: Option<String>,
    tolerance: Tolerance,
    stats: Vec<String>,
    stat_type: StatType,
    experiments: Vec<ExperimentConfig>,
    benchmarks: Vec<BenchmarkSection>,
    restrict: HashMap<String, Vec<String>>,
}

impl SuiteBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn min_version(mut self, version: &str) -> Self {
        self.min_version = Some(version.to_owned());
        self
    }

    #[must_use]
    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn stat(mut self, name: &str) -> Self {
        self.stats.push(name.to_owned());
        self
    }

    #[must_use]
    pub fn stats<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.stats.extend(names.into_iter().map(str::to_owned));
        self
    }

    #[must_use]
    pub fn stat_type(mut self, stat_type: StatType) -> Self {
        self.stat_type = stat_type;
        self
    }

    #[must_use]
    pub fn experiment(mut self, experiment: ExperimentConfig) -> Self {
        self.experiments.push(experiment);
        self
    }

    #[must_use]
    pub fn benchmark(mut self, benchmark: BenchmarkSection) -> Self {
        self.benchmarks.push(benchmark);
        self
    }

    /// Run `experiment` against only the named benchmarks.
    #[must_use]
    pub fn restrict(mut self, experiment: &str, benchmarks: Vec<String>) -> Self {
        self.restrict.insert(experiment.to_owned(), benchmarks);
        self
    }

    /// Expand every benchmark declaration and validate the suite.
    /// The first benchmark-level failure aborts the build naming the
    /// offending benchmark; structural problems are collected and
    /// reported together.
    pub fn build(self) -> Result<Suite, ConfigError> {
        let mut benchmarks = Vec::with_capacity(self.benchmarks.len());
        for section in self.benchmarks {
            benchmarks.push(BenchmarkConfig::from_section(section)?);
        }

        let mut errors = Vec::new();
        if self.stats.is_empty() {
            errors.push("no statistics requested".to_owned());
        }
        if self.experiments.is_empty() {
            errors.push("no experiments declared".to_owned());
        }

        let mut experiment_names = HashSet::new();
        for experiment in &self.experiments {
            if !experiment_names.insert(experiment.name.clone()) {
                errors.push(format!("duplicate experiment '{}'", experiment.name));
            }
        }
        let mut benchmark_names = HashSet::new();
        for benchmark in &benchmarks {
            if !benchmark_names.insert(benchmark.name.clone()) {
                errors.push(format!("duplicate benchmark '{}'", benchmark.name));
            }
        }
        for (experiment, allowed) in &self.restrict {
            if !experiment_names.contains(experiment) {
                errors.push(format!("restriction for unknown experiment '{experiment}'"));
            }
            for name in allowed {
                if !benchmark_names.contains(name) {
                    errors.push(format!("restriction names unknown benchmark '{name}'"));
                }
            }
        }

        if !errors.is_empty() {
            return config_error!("suite '{}':\n{}", self.name, errors.join("\n"));
        }

        Ok(Suite {
            name: self.name,
            min_version: self.min_version,
            tolerance: self.tolerance,
            stats: self.stats,
            stat_type: self.stat_type,
            experiments: self.experiments,
            benchmarks,
            restrict: self.restrict,
        })
    }
}
