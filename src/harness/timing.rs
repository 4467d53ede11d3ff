//! Timed repetition of a workload with warm-up discard.

use std::time::{Duration, Instant};

use crate::error::{BenchError, Result};
use crate::kernels::Tier;
use crate::workload::Workload;

/// Unit timing samples are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millis,
    Micros,
}

impl TimeUnit {
    pub fn convert(self, elapsed: Duration) -> f64 {
        match self {
            TimeUnit::Millis => elapsed.as_nanos() as f64 / 1e6,
            TimeUnit::Micros => elapsed.as_nanos() as f64 / 1e3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "us",
        }
    }
}

/// A clock that measures one trial at a time.
pub trait Stopwatch {
    fn start(&mut self);
    /// Time since the last `start`.
    fn stop(&mut self) -> Duration;
}

/// Monotonic wall clock backed by `Instant`.
#[derive(Debug, Default)]
pub struct MonotonicStopwatch {
    started: Option<Instant>,
}

impl Stopwatch for MonotonicStopwatch {
    #[inline]
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    #[inline]
    fn stop(&mut self) -> Duration {
        self.started.take().map(|s| s.elapsed()).unwrap_or_default()
    }
}

/// How many times to run a kernel and which trials to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingPlan {
    inner_repetitions: usize,
    outer_iterations: usize,
    warmup: usize,
    unit: TimeUnit,
}

impl TimingPlan {
    /// `outer_iterations` includes the `warmup` trials that get discarded.
    pub fn new(
        inner_repetitions: usize,
        outer_iterations: usize,
        warmup: usize,
        unit: TimeUnit,
    ) -> Result<Self> {
        if inner_repetitions == 0 {
            return Err(BenchError::Config("inner repetitions must be > 0".into()));
        }
        if outer_iterations <= warmup {
            return Err(BenchError::Config(format!(
                "{} trials leave nothing after discarding {} warm-up trials",
                outer_iterations, warmup
            )));
        }
        Ok(Self {
            inner_repetitions,
            outer_iterations,
            warmup,
            unit,
        })
    }

    pub fn inner_repetitions(&self) -> usize {
        self.inner_repetitions
    }

    pub fn outer_iterations(&self) -> usize {
        self.outer_iterations
    }

    pub fn warmup(&self) -> usize {
        self.warmup
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Samples kept after the warm-up prefix is dropped.
    pub fn retained(&self) -> usize {
        self.outer_iterations - self.warmup
    }
}

/// Runs `workload` at `tier` according to `plan` and returns one sample per
/// retained trial, in trial order.
///
/// Each trial resets the workload, then times `inner_repetitions` back to
/// back invocations and records the per-invocation average. The first
/// `warmup` trials run but are not recorded.
pub fn measure<W, S>(workload: &mut W, tier: Tier, plan: &TimingPlan, stopwatch: &mut S) -> Vec<f64>
where
    W: Workload + ?Sized,
    S: Stopwatch + ?Sized,
{
    let mut samples = Vec::with_capacity(plan.retained());
    let reps = plan.inner_repetitions;

    for trial in 0..plan.outer_iterations {
        workload.reset();

        stopwatch.start();
        for _ in 0..reps {
            workload.execute(tier);
        }
        let elapsed = stopwatch.stop();

        if trial >= plan.warmup {
            samples.push(plan.unit.convert(elapsed) / reps as f64);
        }
    }

    samples
}

const RESOLUTION_PROBES: usize = 64;

/// Smallest non-zero step observed between two `Instant::now()` readings.
pub fn timer_resolution() -> Duration {
    let mut best = Duration::MAX;
    for _ in 0..RESOLUTION_PROBES {
        let start = Instant::now();
        let mut now = Instant::now();
        while now == start {
            now = Instant::now();
        }
        best = best.min(now - start);
    }
    best
}
