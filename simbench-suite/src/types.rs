// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Raw suite-file sections and the validated configuration types built
//! from them.

use serde::Deserialize;

use crate::{ConfigError, config_error};
use simbench_pipeline::Pipeline;

/// A field that is either one value shared by every traffic class or
/// an ordered per-class list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PerClass<T> {
    Scalar(T),
    Vector(Vec<T>),
}

impl<T: Clone> PerClass<T> {
    /// Produce exactly `classes` values: scalars replicate, a list of
    /// one broadcasts, a list of `classes` entries passes through.
    /// Any other length is a declaration error.
    pub fn expand(
        &self,
        classes: usize,
        field: &str,
        benchmark: &str,
    ) -> Result<Vec<T>, ConfigError> {
        match self {
            PerClass::Scalar(v) => Ok(vec![v.clone(); classes]),
            PerClass::Vector(vs) => broadcast(vs.clone(), classes, field, benchmark),
        }
    }
}

/// Length rule shared by list-valued fields.
pub(crate) fn broadcast<T: Clone>(
    values: Vec<T>,
    classes: usize,
    field: &str,
    benchmark: &str,
) -> Result<Vec<T>, ConfigError> {
    match values.len() {
        n if n == classes => Ok(values),
        1 => Ok(vec![values[0].clone(); classes]),
        n => config_error!(
            "benchmark '{benchmark}': field '{field}' has {n} entries for {classes} classes"
        ),
    }
}

/// The type simulator statistics are declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StatType {
    #[default]
    #[serde(rename = "f")]
    Float,
    #[serde(rename = "i")]
    Int,
}

/// Comparison tolerance for golden values. Simulator revisions drift
/// by roughly 1e-6..1e-3, so exact matching is never used.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Tolerance {
    #[serde(default = "Tolerance::default_relative")]
    pub relative: f64,
    #[serde(default = "Tolerance::default_absolute")]
    pub absolute: f64,
}

impl Tolerance {
    fn default_relative() -> f64 {
        1e-3
    }

    fn default_absolute() -> f64 {
        1e-9
    }

    /// True when `measured` agrees with `expected` within this
    /// tolerance.
    #[must_use]
    pub fn accepts(&self, measured: f64, expected: f64) -> bool {
        (measured - expected).abs() <= self.absolute + self.relative * expected.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: Self::default_relative(),
            absolute: Self::default_absolute(),
        }
    }
}

/// Simulator-level settings shared by every benchmark run under the
/// experiment. Unset fields are left to the simulator's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    pub k: Option<i64>,
    pub sm_rate_ghz: Option<f64>,
    pub deadlock_warn_timeout: Option<i64>,
    pub vc_buf_size: Option<i64>,
    pub coalescing_degree: Option<i64>,
    pub packet_size: Option<i64>,
    pub outport_util_estimator: Option<f64>,
    pub warmup_periods: Option<i64>,
    pub max_samples: Option<i64>,
}

/// One benchmark exactly as declared in a suite file, before per-class
/// expansion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchmarkSection {
    pub name: String,
    pub classes: Option<usize>,
    pub injection_process: Option<PerClass<String>>,
    pub injection_rate: Option<PerClass<f64>>,
    pub packet_size: Option<PerClass<i64>>,
    pub use_read_write: Option<PerClass<i64>>,
    pub write_fraction: Option<PerClass<f64>>,
    pub rcu_type: Option<String>,
    pub internal_speedup: Option<f64>,
    pub outport_util_threshold: Option<f64>,
    pub outport_util_estimator: Option<f64>,
    pub swm_app_run_mode: Option<i64>,
    pub swm_args: Option<String>,
    pub roi: Option<i64>,
    pub roi_begin: Option<i64>,
    pub roi_end: Option<i64>,
}

/// One traffic class of a benchmark after expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSpec {
    pub injection: Pipeline,
    pub packet_size: Option<i64>,
    pub injection_rate: Option<f64>,
    pub use_read_write: Option<bool>,
    pub write_fraction: Option<f64>,
}

/// A benchmark with every per-class field resolved to exactly
/// `classes` values.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub name: String,
    pub classes: usize,
    pub class_specs: Vec<ClassSpec>,
    pub rcu_type: Option<String>,
    pub internal_speedup: Option<f64>,
    pub outport_util_threshold: Option<f64>,
    pub outport_util_estimator: Option<f64>,
    pub swm_app_run_mode: Option<i64>,
    pub swm_args: Option<String>,
    pub roi: Option<i64>,
    pub roi_begin: Option<i64>,
    pub roi_end: Option<i64>,
}

impl BenchmarkConfig {
    /// Expand a raw declaration against its class count.
    pub fn from_section(section: BenchmarkSection) -> Result<Self, ConfigError> {
        let name = section.name.clone();
        if name.is_empty() {
            return config_error!("benchmark with no name");
        }
        let classes = section.classes.unwrap_or(1);
        if classes < 1 {
            return config_error!("benchmark '{name}': classes must be >= 1");
        }

        let Some(process) = &section.injection_process else {
            return config_error!("benchmark '{name}': no injection_process");
        };
        let injections = expand_pipelines(process, classes, &name)?;

        let packet_size = expand_optional(&section.packet_size, classes, "packet_size", &name)?;
        let injection_rate =
            expand_optional(&section.injection_rate, classes, "injection_rate", &name)?;
        let use_read_write =
            expand_optional(&section.use_read_write, classes, "use_read_write", &name)?;
        let write_fraction =
            expand_optional(&section.write_fraction, classes, "write_fraction", &name)?;

        let mut class_specs = Vec::with_capacity(classes);
        for c in 0..classes {
            let spec = ClassSpec {
                injection: injections[c].clone(),
                packet_size: packet_size.as_ref().map(|v| v[c]),
                injection_rate: injection_rate.as_ref().map(|v| v[c]),
                use_read_write: use_read_write.as_ref().map(|v| v[c] != 0),
                write_fraction: write_fraction.as_ref().map(|v| v[c]),
            };
            if let Some(rate) = spec.injection_rate {
                if !(0.0..=1.0).contains(&rate) {
                    return config_error!(
                        "benchmark '{name}': injection_rate {rate} outside [0,1] for class {c}"
                    );
                }
            }
            if let Some(frac) = spec.write_fraction {
                if !(0.0..=1.0).contains(&frac) {
                    return config_error!(
                        "benchmark '{name}': write_fraction {frac} outside [0,1] for class {c}"
                    );
                }
            }
            class_specs.push(spec);
        }

        Ok(Self {
            name,
            classes,
            class_specs,
            rcu_type: section.rcu_type,
            internal_speedup: section.internal_speedup,
            outport_util_threshold: section.outport_util_threshold,
            outport_util_estimator: section.outport_util_estimator,
            swm_app_run_mode: section.swm_app_run_mode,
            swm_args: section.swm_args,
            roi: section.roi,
            roi_begin: section.roi_begin,
            roi_end: section.roi_end,
        })
    }
}

fn expand_optional<T: Clone>(
    field: &Option<PerClass<T>>,
    classes: usize,
    field_name: &str,
    benchmark: &str,
) -> Result<Option<Vec<T>>, ConfigError> {
    match field {
        Some(pc) => Ok(Some(pc.expand(classes, field_name, benchmark)?)),
        None => Ok(None),
    }
}

/// Parse and expand the injection pipelines. A scalar string may carry
/// a whole brace-delimited class list; a YAML list gives one pipeline
/// string per class.
fn expand_pipelines(
    process: &PerClass<String>,
    classes: usize,
    benchmark: &str,
) -> Result<Vec<Pipeline>, ConfigError> {
    let pipelines = match process {
        PerClass::Scalar(s) => simbench_pipeline::parse_pipeline_list(s),
        PerClass::Vector(ss) => ss
            .iter()
            .map(|s| simbench_pipeline::parse_pipeline(s))
            .collect(),
    }
    .map_err(|e| ConfigError(format!("benchmark '{benchmark}': {e}")))?;
    broadcast(pipelines, classes, "injection_process", benchmark)
}
