// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Golden baseline tables.
//!
//! The persisted format groups ordered benchmark rows under an
//! experiment header comment, values in requested-stat order:
//!
//! ```text
//! # sm_fat_c4:
//! 001,0.049237,0.147727,0.012309
//! 002,0.266373,0.799099,0.066593
//! ```
//!
//! A comment consisting of exactly one word ending in a colon is
//! reserved as an experiment header. Any other `#` line is free-text
//! commentary and is skipped, so annotations like
//! `# recorded at sm_dev 8d39c5b` are safe anywhere in the file.
//!
//! Tables are read-only once loaded and shared by every comparison.
//! Baselines belong to one simulator revision; suites version-gate
//! them rather than merging values across revisions.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use simbench_suite::{ConfigError, config_error};

#[derive(Debug, Default)]
pub struct GoldenTable {
    expected: HashMap<(String, String), Vec<f64>>,
}

impl GoldenTable {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("Unable to read {}: {e}", path.display())))?;
        Self::from_string(&s)
    }

    pub fn from_string(table_str: &str) -> Result<Self, ConfigError> {
        let header_re = Regex::new(r"^#\s*(?<experiment>\S+):\s*$").unwrap();
        let mut expected = HashMap::new();
        let mut current: Option<String> = None;

        for (lineno, line) in table_str.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(caps) = header_re.captures(line) {
                current = Some(caps.name("experiment").unwrap().as_str().to_owned());
                continue;
            }
            if line.starts_with('#') {
                continue; // ordinary comment
            }

            let Some(experiment) = &current else {
                return config_error!("golden line {}: row before experiment header", lineno + 1);
            };
            let mut fields = line.split(',').map(str::trim);
            let benchmark = fields.next().unwrap_or_default();
            if benchmark.is_empty() {
                return config_error!("golden line {}: missing benchmark name", lineno + 1);
            }
            let mut values = Vec::new();
            for field in fields {
                match field.parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) => {
                        return config_error!(
                            "golden line {}: '{field}' is not a number",
                            lineno + 1
                        );
                    }
                }
            }
            if values.is_empty() {
                return config_error!("golden line {}: no values for '{benchmark}'", lineno + 1);
            }
            let key = (experiment.clone(), benchmark.to_owned());
            if expected.insert(key, values).is_some() {
                return config_error!(
                    "golden line {}: duplicate entry {experiment}/{benchmark}",
                    lineno + 1
                );
            }
        }
        Ok(Self { expected })
    }

    /// Expected values for one run, in requested-stat order. `None`
    /// when the run has no recorded baseline.
    #[must_use]
    pub fn lookup(&self, experiment: &str, benchmark: &str) -> Option<&[f64]> {
        self.expected
            .get(&(experiment.to_owned(), benchmark.to_owned()))
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }
}
