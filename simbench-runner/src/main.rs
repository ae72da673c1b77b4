// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Command-line front end for running a regression suite.
//!
//! For example:
//!   cargo run --bin simbench-runner -- --suite suites/swm_fat.yaml \
//!     --golden suites/swm_fat.golden --simulator /opt/sim/booksim

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;

use simbench_runner::{GoldenTable, ProcessSimulator, run_suite};
use simbench_suite::Suite;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Run a simulator regression suite and check golden results")]
struct Cli {
    /// Suite definition file (YAML).
    #[arg(long)]
    suite: PathBuf,

    /// Golden baseline table. Without one, every run is reported
    /// unverified.
    #[arg(long)]
    golden: Option<PathBuf>,

    /// Path to the simulator binary.
    #[arg(long)]
    simulator: PathBuf,

    /// Directory for per-run output directories.
    #[arg(long, default_value = "runs")]
    work_dir: PathBuf,

    /// Number of simulator processes to run in parallel.
    #[arg(long, default_value = "1")]
    jobs: usize,

    /// Wall-clock timeout per run, in seconds.
    #[arg(long, default_value = "3600")]
    run_timeout_secs: u64,

    /// Write the measured values to this file in golden-table format.
    #[arg(long)]
    write_golden: Option<PathBuf>,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    stdout_level: log::Level,

    /// Hide the progress bar.
    #[arg(long, default_value = "false")]
    no_progress: bool,
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    env_logger::Builder::new()
        .filter_level(args.stdout_level.to_level_filter())
        .init();

    let suite = Suite::from_file(&args.suite)
        .with_context(|| format!("loading suite {}", args.suite.display()))?;
    let golden = match &args.golden {
        Some(path) => Some(
            GoldenTable::from_file(path)
                .with_context(|| format!("loading golden table {}", path.display()))?,
        ),
        None => None,
    };

    let simulator = ProcessSimulator::new(&args.simulator, &args.work_dir)
        .with_run_timeout(Duration::from_secs(args.run_timeout_secs));

    let num_runs = simbench_runner::build_matrix(&suite).len() as u64;
    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(num_runs)
    };

    let report = run_suite(&simulator, &suite, golden.as_ref(), args.jobs, |_| {
        progress.inc(1);
    })
    .with_context(|| format!("running suite {}", suite.name))?;
    progress.finish_and_clear();

    println!("{report}");

    if let Some(path) = &args.write_golden {
        std::fs::write(path, report.to_golden_string())
            .with_context(|| format!("writing golden table {}", path.display()))?;
        println!("wrote golden table to {}", path.display());
    }

    if report.all_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
