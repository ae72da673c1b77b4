// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Parser for the workload composition language.
//!
//! A traffic workload is described as a chain of named, parameterized
//! stages. The first stage generates arrival events and each later
//! stage transforms the stream produced by the one before it:
//!
//! ```text
//! component(random(bernoulli),SMC(switch),packetize(66,18,1500,12.5))
//! ```
//!
//! A stage argument may itself be a stage (`random(bernoulli)` wraps
//! the `bernoulli` arrival process), a number, or an identifier. A
//! bare generator name such as `bernoulli` is a complete single-stage
//! pipeline. Multi-class benchmarks list one pipeline per traffic
//! class inside braces: `{bernoulli,component(random(bernoulli))}`.

use std::error::Error;
use std::fmt;

pub mod parser;
pub mod registry;

pub use parser::{parse_pipeline, parse_pipeline_list, split_top_level};
pub use registry::{StageRole, stage_signature};

/// Build a [ParseError] result from format arguments
#[macro_export]
macro_rules! parse_error {
    ($($arg:tt)*) => {
        Err($crate::ParseError(format!($($arg)*)))
    };
}

/// Error raised for a malformed pipeline description. Fatal to the
/// benchmark definition that contains it.
#[derive(Debug)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pipeline parse error: {}", self.0)
    }
}

impl Error for ParseError {}

/// A literal or nested-stage argument of a pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Ident(String),
    Stage(StageSpec),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arg::Int(v) => write!(f, "{v}"),
            // Keep a decimal point so the literal reparses as a float
            Arg::Float(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Arg::Ident(name) => write!(f, "{name}"),
            Arg::Stage(spec) => write!(f, "{spec}"),
        }
    }
}

/// One named stage with its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    pub name: String,
    pub args: Vec<Arg>,
}

impl StageSpec {
    pub fn new(name: &str, args: Vec<Arg>) -> Self {
        Self {
            name: name.to_owned(),
            args,
        }
    }

    /// A stage with no arguments, e.g. a bare arrival process.
    pub fn bare(name: &str) -> Self {
        Self::new(name, Vec::new())
    }
}

impl fmt::Display for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// An ordered chain of stages describing one traffic class.
///
/// `component(a,b,c)` lists the chain explicitly; any other root is a
/// chain of one. Stages are stored generator-first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<StageSpec>,
}

impl Pipeline {
    /// Canonical form used for semantic comparison: a bare generator
    /// `g` denotes the same workload as `component(random(g))`, so the
    /// leading stage is promoted to `random(g)` when it is a bare
    /// terminal generator.
    #[must_use]
    pub fn canonical(&self) -> Pipeline {
        let mut stages = self.stages.clone();
        if let Some(first) = stages.first_mut() {
            if first.args.is_empty() && registry::is_terminal_generator(&first.name) {
                let inner = std::mem::replace(first, StageSpec::bare("random"));
                first.args.push(Arg::Ident(inner.name));
            }
        }
        Pipeline { stages }
    }

    /// True when two pipelines denote the same workload.
    #[must_use]
    pub fn equivalent(&self, other: &Pipeline) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for Pipeline {
    /// The simulator dispatches injection processes by top-level name
    /// and only understands bare terminal generators and
    /// `component(...)`, so every other chain keeps the wrapper.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let [stage] = self.stages.as_slice() {
            if stage.args.is_empty() && registry::is_terminal_generator(&stage.name) {
                return write!(f, "{stage}");
            }
        }
        write!(f, "component(")?;
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{stage}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_args_keep_their_decimal_point() {
        assert_eq!(Arg::Float(1.0).to_string(), "1.0");
        assert_eq!(Arg::Float(12.5).to_string(), "12.5");
        assert_eq!(Arg::Int(1).to_string(), "1");
    }

    #[test]
    fn bare_generator_promotes_to_random() {
        let bare = parse_pipeline("bernoulli").unwrap();
        let wrapped = parse_pipeline("component(random(bernoulli))").unwrap();
        assert_eq!(bare.canonical(), wrapped.canonical());
        assert!(bare.equivalent(&wrapped));
    }

    #[test]
    fn single_stage_chains_keep_the_component_wrapper() {
        let swm = parse_pipeline("component(SWM(barrier))").unwrap();
        assert_eq!(swm.to_string(), "component(SWM(barrier))");
        let wrapped = parse_pipeline("random(bernoulli)").unwrap();
        assert_eq!(wrapped.to_string(), "component(random(bernoulli))");
        // only bare terminal generators are valid unwrapped
        assert_eq!(parse_pipeline("sm").unwrap().to_string(), "sm");
        assert_eq!(parse_pipeline("bernoulli").unwrap().to_string(), "bernoulli");
    }

    #[test]
    fn modifiers_are_not_transparent() {
        let plain = parse_pipeline("component(random(bernoulli))").unwrap();
        let coalesced = parse_pipeline("component(random(bernoulli),SMC(switch))").unwrap();
        assert!(!plain.equivalent(&coalesced));
    }
}
