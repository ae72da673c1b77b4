// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared runner types.

use std::error::Error;
use std::fmt;

/// A failure while executing one run or extracting its statistics.
///
/// `Version` failures abort the whole suite before anything runs; the
/// other variants are recorded against their run and the matrix
/// continues.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// Simulator could not be launched or did not finish cleanly
    /// (missing binary, nonzero exit, timeout).
    Launch(String),
    /// Detected simulator version is older than the suite requires.
    Version(String),
    /// A requested statistic is absent from the simulator output.
    StatNotFound(String),
    /// A statistic was present but its value did not convert to the
    /// declared type.
    StatParse(String),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::Launch(msg) => write!(f, "Simulator launch failed: {msg}"),
            RunError::Version(msg) => write!(f, "Simulator version check failed: {msg}"),
            RunError::StatNotFound(msg) => write!(f, "Statistic not found: {msg}"),
            RunError::StatParse(msg) => write!(f, "Statistic parse failed: {msg}"),
        }
    }
}

impl Error for RunError {}
