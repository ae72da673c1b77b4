// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Extraction of named scalar statistics from raw simulator output.
//!
//! Two output shapes are understood: `Name = value` lines, and the CSV
//! row mode where the simulator prints `benchmark,stat1,stat2,...` in
//! the requested order (the same layout golden tables use).

use std::collections::HashMap;

use regex::Regex;

use crate::types::RunError;
use simbench_suite::StatType;

/// Measured statistics for one run, in requested order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    values: Vec<(String, f64)>,
}

impl RunResult {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    #[must_use]
    pub fn values(&self) -> &[(String, f64)] {
        &self.values
    }
}

pub struct StatExtractor {
    stat_line_re: Regex,
}

impl Default for StatExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StatExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stat_line_re: Regex::new(r"^\s*(?<name>[^=,]+?)\s*=\s*(?<value>\S+)\s*$").unwrap(),
        }
    }

    /// Pull the requested statistics for `benchmark` out of raw
    /// simulator output.
    pub fn extract(
        &self,
        output: &str,
        benchmark: &str,
        stats: &[String],
        stat_type: StatType,
    ) -> Result<RunResult, RunError> {
        let mut named: HashMap<&str, &str> = HashMap::new();
        let mut csv_row: Option<Vec<&str>> = None;

        for line in output.lines() {
            if let Some(caps) = self.stat_line_re.captures(line) {
                named.insert(
                    caps.name("name").unwrap().as_str(),
                    caps.name("value").unwrap().as_str(),
                );
                continue;
            }
            let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
            if fields.len() == stats.len() + 1 && fields[0] == benchmark {
                csv_row = Some(fields);
            }
        }

        let mut values = Vec::with_capacity(stats.len());
        for (i, stat) in stats.iter().enumerate() {
            let raw = named
                .get(stat.as_str())
                .copied()
                .or_else(|| csv_row.as_ref().map(|row| row[i + 1]));
            let Some(raw) = raw else {
                return Err(RunError::StatNotFound(format!(
                    "'{stat}' missing from output of benchmark {benchmark}"
                )));
            };
            values.push((stat.clone(), parse_value(raw, stat, stat_type)?));
        }
        Ok(RunResult { values })
    }
}

fn parse_value(raw: &str, stat: &str, stat_type: StatType) -> Result<f64, RunError> {
    match stat_type {
        StatType::Float => raw.parse::<f64>().map_err(|_| {
            RunError::StatParse(format!("'{stat}': '{raw}' is not a float"))
        }),
        StatType::Int => raw
            .parse::<i64>()
            .map(|v| v as f64)
            .map_err(|_| RunError::StatParse(format!("'{stat}': '{raw}' is not an integer"))),
    }
}
