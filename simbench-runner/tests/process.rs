// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Exercises the process boundary with small shell-script simulators.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use simbench_runner::{ProcessSimulator, RunError, RunRequest, Simulator, check_version};

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fakesim");
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn request() -> RunRequest {
    RunRequest {
        experiment: "swm_fat".to_owned(),
        benchmark: "001".to_owned(),
        params: vec![
            ("k".to_owned(), "8".to_owned()),
            ("injection_process".to_owned(), "bernoulli".to_owned()),
        ],
        out_dir: "swm_fat_001".to_owned(),
    }
}

#[test]
fn runs_and_captures_stdout() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        r#"
if [ "$1" = "--version" ]; then echo "fakesim 2.3.1"; exit 0; fi
echo "args: $@"
echo "Flit BW = 0.398869"
"#,
    );
    let simulator = ProcessSimulator::new(&script, dir.path());
    let output = simulator.run(&request()).unwrap();
    assert!(output.contains("args: k=8 injection_process=bernoulli"));
    assert!(output.contains("Flit BW = 0.398869"));
    // each cell gets its own output directory
    assert!(dir.path().join("swm_fat_001").is_dir());
}

#[test]
fn version_is_scraped_from_version_output() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        r#"
if [ "$1" = "--version" ]; then echo "fakesim 2.3.1"; exit 0; fi
"#,
    );
    let simulator = ProcessSimulator::new(&script, dir.path());
    assert_eq!(simulator.version().unwrap(), "2.3.1".parse().unwrap());
    // an older requirement passes, a newer one refuses
    check_version(&simulator, "2.0.0").unwrap();
    let err = check_version(&simulator, "3.0.0").unwrap_err();
    assert!(matches!(err, RunError::Version(_)));
}

#[test]
fn nonzero_exit_is_a_launch_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "echo deadlock detected >&2\nexit 3\n");
    let simulator = ProcessSimulator::new(&script, dir.path());
    let err = simulator.run(&request()).unwrap_err();
    match err {
        RunError::Launch(msg) => {
            assert!(msg.contains("swm_fat/001"));
            assert!(msg.contains("deadlock detected"));
        }
        other => panic!("expected Launch, got {other:?}"),
    }
}

#[test]
fn output_larger_than_the_pipe_buffer_is_drained() {
    // Well past the ~64 KiB OS pipe buffer; without concurrent
    // draining the child blocks on a full pipe and hits the timeout.
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        r#"
awk 'BEGIN { for (i = 0; i < 20000; i++) print "cycle", i, ": router xbar allocation trace" }'
echo "Flit BW = 0.398869"
"#,
    );
    let simulator =
        ProcessSimulator::new(&script, dir.path()).with_run_timeout(Duration::from_secs(10));
    let output = simulator.run(&request()).unwrap();
    assert!(output.len() > 64 * 1024);
    assert!(output.contains("Flit BW = 0.398869"));
}

#[test]
fn hung_run_is_killed_at_the_timeout() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "sleep 30\n");
    let simulator = ProcessSimulator::new(&script, dir.path())
        .with_run_timeout(Duration::from_millis(200));
    let err = simulator.run(&request()).unwrap_err();
    match err {
        RunError::Launch(msg) => assert!(msg.contains("timed out")),
        other => panic!("expected Launch, got {other:?}"),
    }
}

#[test]
fn missing_binary_is_a_launch_error() {
    let dir = TempDir::new().unwrap();
    let simulator = ProcessSimulator::new(&dir.path().join("nope"), dir.path());
    let err = simulator.run(&request()).unwrap_err();
    assert!(matches!(err, RunError::Launch(_)));
    let err = simulator.version().unwrap_err();
    assert!(matches!(err, RunError::Version(_)));
}
