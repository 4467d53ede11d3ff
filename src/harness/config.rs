//! Benchmark configuration: execution modes and per-kind defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::{BenchError, Result};
use crate::harness::report::Schema;
use crate::harness::timing::{TimeUnit, TimingPlan};
use crate::kernels::{self, Tier};
use crate::workload::BenchmarkKind;

/// Leading trials dropped from every measurement.
pub const DEFAULT_WARMUP: usize = 10;

/// Trials kept in the pre-flight pass.
pub const PREFLIGHT_ITERATIONS: usize = 1;

pub const DOT_SIZES: [usize; 8] = [128, 256, 512, 1024, 2048, 4096, 8192, 16384];
pub const MATMUL_SIZES: [usize; 3] = [256, 512, 1024];

/// Dot products are fast enough that one call is below clock resolution.
pub const DOT_INNER_REPETITIONS: usize = 20_000;

/// Which capability tiers beyond Scalar and Width4 are unlocked.
///
/// The tier is supplied from outside, never probed from the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Scalar and Width4 only.
    Baseline,
    /// Adds Width8.
    Avx,
    /// Adds Width16.
    Avx512,
}

impl ExecutionMode {
    pub fn unlocks(self, tier: Tier) -> bool {
        match tier {
            Tier::Scalar | Tier::Width4 => true,
            Tier::Width8 => self == ExecutionMode::Avx,
            Tier::Width16 => self == ExecutionMode::Avx512,
        }
    }

    pub fn available_tiers(self) -> Vec<Tier> {
        Tier::ALL.into_iter().filter(|&t| self.unlocks(t)).collect()
    }

    /// Unlocked vector tiers that will time the portable lanes because the
    /// running CPU has no native encoding for them.
    pub fn portable_tiers(self) -> Vec<Tier> {
        self.available_tiers()
            .into_iter()
            .filter(|&t| t != Tier::Scalar && kernels::backend(t) == "portable")
            .collect()
    }

    pub const fn name(self) -> &'static str {
        match self {
            ExecutionMode::Baseline => "baseline",
            ExecutionMode::Avx => "avx",
            ExecutionMode::Avx512 => "avx512",
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" => Ok(ExecutionMode::Baseline),
            "avx" => Ok(ExecutionMode::Avx),
            "avx512" => Ok(ExecutionMode::Avx512),
            // Names used by older run scripts.
            "coreclr" => Ok(ExecutionMode::Avx),
            "llvm" => Ok(ExecutionMode::Avx512),
            _ => Err(BenchError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the driver needs besides the execution mode.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Problem sizes in run order: vector length for dot, matrix side for matmul.
    pub sizes: Vec<usize>,
    pub warmup: usize,
    pub inner_repetitions: usize,
    /// Retained trials in the pre-flight pass.
    pub preflight_iterations: usize,
    /// Retained trials in the full pass.
    pub iterations: usize,
    pub unit: TimeUnit,
    pub schema: Schema,
}

impl BenchConfig {
    pub fn for_kind(kind: BenchmarkKind) -> Self {
        match kind {
            BenchmarkKind::Dot => Self {
                sizes: DOT_SIZES.to_vec(),
                warmup: DEFAULT_WARMUP,
                inner_repetitions: DOT_INNER_REPETITIONS,
                preflight_iterations: PREFLIGHT_ITERATIONS,
                iterations: 1,
                unit: TimeUnit::Micros,
                schema: Schema::Full,
            },
            BenchmarkKind::Matmul => Self {
                sizes: MATMUL_SIZES.to_vec(),
                warmup: DEFAULT_WARMUP,
                inner_repetitions: 1,
                preflight_iterations: PREFLIGHT_ITERATIONS,
                iterations: 1,
                unit: TimeUnit::Millis,
                schema: Schema::Full,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(BenchError::Config("no problem sizes configured".into()));
        }
        if let Some(&zero) = self.sizes.iter().find(|&&s| s == 0) {
            return Err(BenchError::Config(format!("problem size {} is not positive", zero)));
        }
        if self.iterations == 0 {
            return Err(BenchError::Config("iteration count must be > 0".into()));
        }
        if self.preflight_iterations == 0 {
            return Err(BenchError::Config("pre-flight iteration count must be > 0".into()));
        }
        if self.inner_repetitions == 0 {
            return Err(BenchError::Config("inner repetitions must be > 0".into()));
        }
        Ok(())
    }

    pub fn preflight_plan(&self) -> Result<TimingPlan> {
        self.plan(self.preflight_iterations)
    }

    pub fn full_plan(&self) -> Result<TimingPlan> {
        self.plan(self.iterations)
    }

    fn plan(&self, retained: usize) -> Result<TimingPlan> {
        let outer = retained
            .checked_add(self.warmup)
            .ok_or_else(|| BenchError::Config("iteration count plus warm-up overflows".into()))?;
        TimingPlan::new(self.inner_repetitions, outer, self.warmup, self.unit)
    }
}
