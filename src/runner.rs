// =============================================================================
// Worker pool runner: spawn, join, report
// =============================================================================

use crate::counter::SharedCounter;
use crate::error::RunError;
use std::fmt;
use std::io;
use std::num::NonZeroUsize;
use std::thread;
use std::time::{Duration, Instant};

// =============================================================================
// Run configuration
// =============================================================================

/// Inputs of one run. Read-only once workers are spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub cycle_count: u64,
    pub step_size: i64,
    pub thread_count: NonZeroUsize,
}

impl RunConfig {
    pub fn new(cycle_count: u64, step_size: i64, thread_count: NonZeroUsize) -> Self {
        RunConfig {
            cycle_count,
            step_size,
            thread_count,
        }
    }

    /// Uses one worker per logical CPU.
    pub fn with_default_threads(cycle_count: u64, step_size: i64) -> Self {
        Self::new(cycle_count, step_size, Self::default_thread_count())
    }

    /// Logical processors visible to the process, never less than 1.
    pub fn default_thread_count() -> NonZeroUsize {
        NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
    }

    /// `thread_count * cycle_count * step_size`, wrapping like the counter does.
    pub fn expected_total(&self) -> i64 {
        (self.thread_count.get() as i64)
            .wrapping_mul(self.cycle_count as i64)
            .wrapping_mul(self.step_size)
    }
}

// =============================================================================
// Run phases and report
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Spawning,
    Running,
    Joined,
    Reported,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "INIT",
            RunPhase::Spawning => "SPAWNING",
            RunPhase::Running => "RUNNING",
            RunPhase::Joined => "JOINED",
            RunPhase::Reported => "REPORTED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub value: i64,
    pub expected: i64,
    pub threads: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_exact(&self) -> bool {
        self.value == self.expected
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "counter = {}", self.value)
    }
}

// =============================================================================
// Running
// =============================================================================

/// Runs `thread_count` workers against a fresh counter and reports its final
/// value once every worker has been joined.
///
/// If a worker cannot be spawned the run is abandoned: workers that already
/// started are still joined before this returns, and no value is reported.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    run_with_hooks(config, |_| Ok(()), |_| {})
}

/// `before_spawn` is called with each worker index right before that worker
/// is created; an error from it is treated exactly like an OS spawn failure.
/// `on_worker_start` runs inside each worker before its first cycle.
fn run_with_hooks<H, W>(
    config: &RunConfig,
    mut before_spawn: H,
    on_worker_start: W,
) -> Result<RunReport, RunError>
where
    H: FnMut(usize) -> io::Result<()>,
    W: Fn(usize) + Sync,
{
    let requested = config.thread_count.get();
    let cycle_count = config.cycle_count;
    let step_size = config.step_size;

    let counter = SharedCounter::new();
    enter(RunPhase::Init);

    let started = Instant::now();
    let threads = thread::scope(|scope| -> Result<usize, RunError> {
        enter(RunPhase::Spawning);
        let counter = &counter;
        let on_worker_start = &on_worker_start;

        // Handle storage can run out before the OS does.
        let mut handles = Vec::new();
        if let Err(err) = handles.try_reserve_exact(requested) {
            log::error!("no room to track {requested} workers, abandoning run: {err}");
            return Err(RunError::Spawn {
                index: 0,
                requested,
                source: io::Error::new(io::ErrorKind::OutOfMemory, err),
            });
        }

        for index in 0..requested {
            let spawned = before_spawn(index).and_then(|()| {
                thread::Builder::new()
                    .name(format!("accumulator-{index}"))
                    .spawn_scoped(scope, move || {
                        on_worker_start(index);
                        accumulate(index, counter, cycle_count, step_size)
                    })
            });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    log::error!(
                        "spawning worker {index} of {requested} failed, abandoning run: {source}"
                    );
                    // Joined here so a worker panic cannot escape the scope.
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(RunError::Spawn {
                        index,
                        requested,
                        source,
                    });
                }
            }
        }

        enter(RunPhase::Running);
        let mut panicked = None;
        for (index, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(index);
            }
        }

        match panicked {
            Some(index) => {
                log::error!("worker {index} panicked, abandoning run");
                Err(RunError::WorkerPanicked { index })
            }
            None => Ok(requested),
        }
    })?;
    let elapsed = started.elapsed();
    enter(RunPhase::Joined);

    let report = RunReport {
        value: counter.load(),
        expected: config.expected_total(),
        threads,
        elapsed,
    };
    enter(RunPhase::Reported);
    log::info!(
        "{} workers x {} cycles x step {} = {} in {:?}",
        report.threads,
        cycle_count,
        step_size,
        report.value,
        report.elapsed
    );
    if !report.is_exact() {
        log::warn!("expected {}, counted {}", report.expected, report.value);
    }

    Ok(report)
}

fn accumulate(index: usize, counter: &SharedCounter, cycle_count: u64, step_size: i64) {
    log::trace!("accumulator-{index}: {cycle_count} cycles of {step_size}");
    for _ in 0..cycle_count {
        counter.add(step_size);
    }
    log::trace!("accumulator-{index}: done");
}

fn enter(phase: RunPhase) {
    log::debug!("run phase -> {phase}");
}
