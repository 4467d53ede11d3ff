//! Runs every (size, tier) pair and collects the two reports.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::harness::config::{BenchConfig, ExecutionMode};
use crate::harness::report::{Record, Report};
use crate::harness::stats::Summary;
use crate::harness::timing::{MonotonicStopwatch, Stopwatch, TimingPlan, measure};
use crate::kernels::{self, Tier};
use crate::workload::Workload;

/// A size is benchmarked only if every tier's width divides it, so all
/// tiers run on identical problems.
///
/// This holds even when the mode never unlocks the widest tier.
pub fn is_comparable(size: usize) -> bool {
    Tier::ALL.iter().all(|t| t.divides(size))
}

/// Output of one driver run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReports {
    /// Short pass with `preflight_iterations` retained trials.
    pub preflight: Report,
    /// Pass with the configured iteration count.
    pub full: Report,
    /// Sizes dropped by the divisibility check, in configured order.
    pub skipped: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Driver {
    config: BenchConfig,
    mode: ExecutionMode,
    preflight: TimingPlan,
    full: TimingPlan,
}

impl Driver {
    pub fn new(config: BenchConfig, mode: ExecutionMode) -> Result<Self> {
        config.validate()?;
        let preflight = config.preflight_plan()?;
        let full = config.full_plan()?;
        Ok(Self {
            config,
            mode,
            preflight,
            full,
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Benchmarks with the monotonic wall clock.
    pub fn run<W, F>(&self, build: F) -> Result<RunReports>
    where
        W: Workload,
        F: FnMut(usize) -> Result<W>,
    {
        self.run_with(build, &mut MonotonicStopwatch::default())
    }

    /// Benchmarks every configured size. `build` is called once per
    /// comparable size and the workload is reused for both passes and all
    /// tiers.
    pub fn run_with<W, F, S>(&self, mut build: F, stopwatch: &mut S) -> Result<RunReports>
    where
        W: Workload,
        F: FnMut(usize) -> Result<W>,
        S: Stopwatch + ?Sized,
    {
        let mut preflight = Report::new(self.config.schema);
        let mut full = Report::new(self.config.schema);
        let mut skipped = Vec::new();

        for tier in self.mode.portable_tiers() {
            warn!(tier = %tier, "no native instruction set on this CPU, timing the portable lanes");
        }

        for &size in &self.config.sizes {
            if !is_comparable(size) {
                warn!(size, "not evenly divisible by 4, 8 and 16 lanes, skipping");
                skipped.push(size);
                continue;
            }

            info!(
                size,
                iterations = self.config.iterations,
                inner = self.config.inner_repetitions,
                mode = %self.mode,
                "running size"
            );
            let mut workload = build(size)?;

            self.pass(&mut workload, size, &self.preflight, &mut preflight, stopwatch);
            self.pass(&mut workload, size, &self.full, &mut full, stopwatch);
        }

        Ok(RunReports {
            preflight,
            full,
            skipped,
        })
    }

    fn pass<W, S>(&self, workload: &mut W, size: usize, plan: &TimingPlan, report: &mut Report, stopwatch: &mut S)
    where
        W: Workload,
        S: Stopwatch + ?Sized,
    {
        for tier in Tier::ALL {
            if !self.mode.unlocks(tier) {
                report.push(Record::placeholder(tier, size));
                continue;
            }

            let samples = measure(workload, tier, plan, stopwatch);
            match Summary::from_samples(&samples) {
                Some(summary) => {
                    debug!(
                        size,
                        tier = %tier,
                        backend = kernels::backend(tier),
                        mean = summary.mean,
                        stddev = summary.stddev,
                        unit = plan.unit().label(),
                        "tier measured"
                    );
                    report.push(Record::measured(tier, size, summary));
                }
                None => report.push(Record::placeholder(tier, size)),
            }
        }
    }
}
