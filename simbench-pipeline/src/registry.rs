// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The set of known pipeline stages and their argument counts.
//!
//! Stage names are case-sensitive and match the component names the
//! simulator registers for its workload chain.

/// Where a stage may sit in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRole {
    /// Produces arrival events; only valid as the first stage.
    Generator,
    /// Transforms the stream of the previous stage.
    Modifier,
    /// Valid in either position (the coalescing generators double as
    /// in-chain stages in older workload descriptions).
    Either,
}

/// Signature of a known stage.
#[derive(Debug, Clone, Copy)]
pub struct StageSignature {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub role: StageRole,
}

const STAGES: &[StageSignature] = &[
    // Generators
    StageSignature {
        name: "random",
        min_args: 1,
        max_args: 1,
        role: StageRole::Generator,
    },
    StageSignature {
        name: "SWM",
        min_args: 1,
        max_args: usize::MAX,
        role: StageRole::Generator,
    },
    StageSignature {
        name: "bernoulli",
        min_args: 0,
        max_args: 0,
        role: StageRole::Generator,
    },
    StageSignature {
        name: "uniform",
        min_args: 0,
        max_args: 0,
        role: StageRole::Generator,
    },
    StageSignature {
        name: "sm",
        min_args: 0,
        max_args: 1,
        role: StageRole::Either,
    },
    StageSignature {
        name: "sm_end",
        min_args: 0,
        max_args: 1,
        role: StageRole::Either,
    },
    // Modifiers
    StageSignature {
        name: "SMC",
        min_args: 1,
        max_args: 1,
        role: StageRole::Modifier,
    },
    StageSignature {
        name: "packetize",
        min_args: 4,
        max_args: 4,
        role: StageRole::Modifier,
    },
    StageSignature {
        name: "trace",
        min_args: 2,
        max_args: 2,
        role: StageRole::Modifier,
    },
    StageSignature {
        name: "latency",
        min_args: 2,
        max_args: 2,
        role: StageRole::Modifier,
    },
    StageSignature {
        name: "local",
        min_args: 1,
        max_args: 1,
        role: StageRole::Modifier,
    },
    StageSignature {
        name: "Mppn",
        min_args: 1,
        max_args: 1,
        role: StageRole::Modifier,
    },
    StageSignature {
        name: "collxl",
        min_args: 0,
        max_args: 0,
        role: StageRole::Modifier,
    },
];

/// Look up the signature of a stage, if the name is known.
#[must_use]
pub fn stage_signature(name: &str) -> Option<&'static StageSignature> {
    STAGES.iter().find(|s| s.name == name)
}

/// True for zero-argument arrival processes that form a complete
/// pipeline on their own (or appear as `random`'s argument).
#[must_use]
pub fn is_terminal_generator(name: &str) -> bool {
    matches!(
        stage_signature(name),
        Some(StageSignature {
            max_args: 0,
            role: StageRole::Generator,
            ..
        })
    ) || matches!(name, "sm" | "sm_end")
}
