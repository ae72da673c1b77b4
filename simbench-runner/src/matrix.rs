// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Expansion of a suite into the ordered run matrix.

use std::fmt::Display;

use itertools::Itertools;

use simbench_suite::{BenchmarkConfig, ExperimentConfig, Suite};

/// One fully materialized simulator invocation. Identity is the
/// `(experiment, benchmark)` pair; `out_dir` is unique within a suite
/// so concurrent runs never share an output directory.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub experiment: String,
    pub benchmark: String,
    pub params: Vec<(String, String)>,
    pub out_dir: String,
}

impl RunRequest {
    /// `key=value` arguments in declaration order.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect()
    }
}

/// Ordered key/value parameter set. Later writes to a key replace the
/// earlier value in place, so experiment-level settings can be
/// overridden per benchmark without disturbing the ordering.
#[derive(Debug, Default)]
struct ParamSet(Vec<(String, String)>);

impl ParamSet {
    fn set(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_owned(), value)),
        }
    }

    fn set_optional(&mut self, key: &str, value: &Option<impl Display + Clone>) {
        if let Some(v) = value {
            self.set(key, v.clone());
        }
    }
}

/// Build the run matrix: experiment-major, benchmark-minor, preserving
/// suite declaration order and honouring partial-matrix restrictions.
/// Golden tables are keyed by `(experiment, benchmark)`, so this order
/// is what makes reports diffable.
#[must_use]
pub fn build_matrix(suite: &Suite) -> Vec<RunRequest> {
    let mut requests = Vec::new();
    for experiment in &suite.experiments {
        for benchmark in suite.benchmarks_for(&experiment.name) {
            requests.push(materialize(experiment, benchmark));
        }
    }
    requests
}

fn materialize(experiment: &ExperimentConfig, benchmark: &BenchmarkConfig) -> RunRequest {
    let mut params = ParamSet::default();

    params.set_optional("k", &experiment.k);
    params.set_optional("sm_rate_ghz", &experiment.sm_rate_ghz);
    params.set_optional("deadlock_warn_timeout", &experiment.deadlock_warn_timeout);
    params.set_optional("vc_buf_size", &experiment.vc_buf_size);
    params.set_optional("coalescing_degree", &experiment.coalescing_degree);
    params.set_optional("packet_size", &experiment.packet_size);
    params.set_optional("outport_util_estimator", &experiment.outport_util_estimator);
    params.set_optional("warmup_periods", &experiment.warmup_periods);
    params.set_optional("max_samples", &experiment.max_samples);

    params.set_optional("rcu_type", &benchmark.rcu_type);
    params.set_optional("internal_speedup", &benchmark.internal_speedup);
    params.set_optional("outport_util_threshold", &benchmark.outport_util_threshold);
    params.set_optional("outport_util_estimator", &benchmark.outport_util_estimator);
    params.set_optional("swm_app_run_mode", &benchmark.swm_app_run_mode);
    params.set_optional("swm_args", &benchmark.swm_args);
    params.set_optional("roi", &benchmark.roi);
    params.set_optional("roi_begin", &benchmark.roi_begin);
    params.set_optional("roi_end", &benchmark.roi_end);

    if benchmark.classes > 1 {
        params.set("classes", benchmark.classes);
    }
    set_per_class(&mut params, "injection_process", benchmark, |spec| {
        Some(spec.injection.to_string())
    });
    set_per_class(&mut params, "packet_size", benchmark, |spec| spec.packet_size);
    set_per_class(&mut params, "injection_rate", benchmark, |spec| {
        spec.injection_rate
    });
    set_per_class(&mut params, "use_read_write", benchmark, |spec| {
        spec.use_read_write.map(i64::from)
    });
    set_per_class(&mut params, "write_fraction", benchmark, |spec| {
        spec.write_fraction
    });

    RunRequest {
        experiment: experiment.name.clone(),
        benchmark: benchmark.name.clone(),
        params: params.0,
        out_dir: format!("{}_{}", experiment.name, benchmark.name),
    }
}

/// Re-join a per-class field into the simulator's wire form: the bare
/// value for one class, a brace list for several. Fields every class
/// leaves unset are omitted.
fn set_per_class<T: Display>(
    params: &mut ParamSet,
    key: &str,
    benchmark: &BenchmarkConfig,
    field: impl Fn(&simbench_suite::ClassSpec) -> Option<T>,
) {
    let values: Vec<T> = benchmark.class_specs.iter().filter_map(&field).collect();
    if values.is_empty() {
        return;
    }
    if values.len() == 1 {
        params.set(key, &values[0]);
    } else {
        params.set(key, format!("{{{}}}", values.iter().join(",")));
    }
}
