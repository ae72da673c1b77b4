// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Dispatch of run requests to the external simulator.
//!
//! Runs are independent, so [run_matrix] spreads them over a bounded
//! worker pool; results are stored by matrix index so reports keep
//! suite-definition order no matter which worker finished first.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use regex::Regex;

use crate::matrix::RunRequest;
use crate::types::RunError;

const WAIT_POLL: Duration = Duration::from_millis(20);

/// A simulator version, ordered so suites can state a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FromStr for Version {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().trim_start_matches('v').split('.');
        let mut next = |what: &str| -> Result<u32, RunError> {
            match fields.next() {
                Some(text) => text
                    .parse()
                    .map_err(|_| RunError::Version(format!("bad {what} in version '{s}'"))),
                None => Err(RunError::Version(format!("missing {what} in version '{s}'"))),
            }
        };
        let version = Version {
            major: next("major")?,
            minor: next("minor")?,
            patch: next("patch")?,
        };
        if fields.next().is_some() {
            return Err(RunError::Version(format!("trailing fields in version '{s}'")));
        }
        Ok(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The boundary to the simulator: something that reports a version and
/// turns one request into raw output text.
pub trait Simulator: Sync {
    fn version(&self) -> Result<Version, RunError>;
    fn run(&self, request: &RunRequest) -> Result<String, RunError>;
}

/// Runs the real simulator binary, one synchronous process per
/// request, with a wall-clock timeout per run. The timeout here is the
/// harness's own bound; the simulator's `deadlock_warn_timeout` is
/// just another parameter and is enforced inside the simulator.
pub struct ProcessSimulator {
    binary: PathBuf,
    work_dir: PathBuf,
    run_timeout: Duration,
}

impl ProcessSimulator {
    pub fn new(binary: &Path, work_dir: &Path) -> Self {
        Self {
            binary: binary.to_owned(),
            work_dir: work_dir.to_owned(),
            run_timeout: Duration::from_secs(3600),
        }
    }

    #[must_use]
    pub fn with_run_timeout(mut self, run_timeout: Duration) -> Self {
        self.run_timeout = run_timeout;
        self
    }

    fn launch_error(&self, request: &RunRequest, msg: impl fmt::Display) -> RunError {
        RunError::Launch(format!(
            "{}/{}: {msg}",
            request.experiment, request.benchmark
        ))
    }

    /// Drain one child pipe from its own thread. A simulator that logs
    /// more than the OS pipe buffer would otherwise fill the pipe and
    /// never exit.
    fn drain_pipe(
        &self,
        request: &RunRequest,
        pipe: Option<impl Read + Send + 'static>,
    ) -> Result<thread::JoinHandle<Vec<u8>>, RunError> {
        let Some(mut pipe) = pipe else {
            return Err(self.launch_error(request, "child pipe was not captured"));
        };
        Ok(thread::spawn(move || {
            let mut buf = Vec::new();
            // Reads until EOF; a killed child closes the pipe too
            let _ = pipe.read_to_end(&mut buf);
            buf
        }))
    }

    fn collect_pipe(
        &self,
        request: &RunRequest,
        reader: thread::JoinHandle<Vec<u8>>,
    ) -> Result<Vec<u8>, RunError> {
        reader
            .join()
            .map_err(|_| self.launch_error(request, "output reader thread panicked"))
    }
}

impl Simulator for ProcessSimulator {
    fn version(&self) -> Result<Version, RunError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| {
                RunError::Version(format!("cannot run {}: {e}", self.binary.display()))
            })?;
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let re = Regex::new(r"(\d+)\.(\d+)\.(\d+)").unwrap();
        match re.find(&text) {
            Some(m) => m.as_str().parse(),
            None => Err(RunError::Version(format!(
                "no version string in output of {} --version",
                self.binary.display()
            ))),
        }
    }

    fn run(&self, request: &RunRequest) -> Result<String, RunError> {
        let run_dir = self.work_dir.join(&request.out_dir);
        std::fs::create_dir_all(&run_dir)
            .map_err(|e| self.launch_error(request, format!("cannot create {}: {e}", run_dir.display())))?;

        debug!(
            "{}/{}: {} {}",
            request.experiment,
            request.benchmark,
            self.binary.display(),
            request.args().join(" ")
        );
        let mut child = Command::new(&self.binary)
            .args(request.args())
            .current_dir(&run_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(request, format!("cannot spawn {}: {e}", self.binary.display())))?;

        let stdout_reader = self.drain_pipe(request, child.stdout.take())?;
        let stderr_reader = self.drain_pipe(request, child.stderr.take())?;

        // Poll rather than wait: a hung simulator is killed outright,
        // there is no checkpoint protocol to signal.
        let deadline = Instant::now() + self.run_timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(
                            "{}/{}: killing run after {:?}",
                            request.experiment, request.benchmark, self.run_timeout
                        );
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(self.launch_error(
                            request,
                            format!("timed out after {:?}", self.run_timeout),
                        ));
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(e) => return Err(self.launch_error(request, format!("wait failed: {e}"))),
            }
        };

        let stdout = self.collect_pipe(request, stdout_reader)?;
        let stderr = self.collect_pipe(request, stderr_reader)?;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(self.launch_error(
                request,
                format!("exit status {status}: {}", stderr.trim()),
            ));
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Refuse to run when the detected simulator is older than the suite
/// requires. Called before any run executes.
pub fn check_version(simulator: &dyn Simulator, min_version: &str) -> Result<(), RunError> {
    let required: Version = min_version.parse()?;
    let detected = simulator.version()?;
    if detected < required {
        return Err(RunError::Version(format!(
            "simulator is {detected}, suite requires at least {required}"
        )));
    }
    debug!("simulator version {detected} satisfies minimum {required}");
    Ok(())
}

/// Execute every request over `jobs` workers. Failures are captured
/// per run, never propagated: the whole matrix always executes and the
/// returned vector matches the request order. `on_done` is called as
/// each run finishes (from worker threads).
pub fn run_matrix<F>(
    simulator: &dyn Simulator,
    requests: &[RunRequest],
    jobs: usize,
    on_done: F,
) -> Vec<Result<String, RunError>>
where
    F: Fn(&RunRequest) + Sync,
{
    let workers = jobs.clamp(1, requests.len().max(1));
    info!("running {} jobs over {workers} worker(s)", requests.len());

    let next = AtomicUsize::new(0);
    let results: Vec<Mutex<Option<Result<String, RunError>>>> =
        requests.iter().map(|_| Mutex::new(None)).collect();

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    if i >= requests.len() {
                        break;
                    }
                    let request = &requests[i];
                    debug!("start {}/{}", request.experiment, request.benchmark);
                    let result = simulator.run(request);
                    *results[i].lock().unwrap() = Some(result);
                    on_done(request);
                }
            });
        }
    });

    results
        .into_iter()
        .map(|slot| match slot.into_inner().unwrap() {
            Some(result) => result,
            None => Err(RunError::Launch("run was never dispatched".to_owned())),
        })
        .collect()
}
