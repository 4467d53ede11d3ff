//! Cross-tier sanity checks run by the `diag` action.
//!
//! Every unlocked tier runs once on a small deterministic workload and is
//! compared with the scalar tier. Nothing is timed.

use crate::error::{BenchError, Result};
use crate::harness::config::ExecutionMode;
use crate::kernels::{self, Element, Tier};
use crate::workload::{DotWorkload, Fill, MatmulWorkload, Workload};

/// Vector length for the dot product check (512 × 512).
pub const DIAG_DOT_LEN: usize = 262_144;

/// Side of the matrices for the matmul check.
pub const DIAG_MATRIX_SIZE: usize = 16;

/// One tier's diagnostic outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TierCheck<R> {
    pub tier: Tier,
    pub backend: &'static str,
    pub result: R,
    /// Agrees with the scalar tier.
    pub agrees: bool,
}

fn ensure_divisible(mode: ExecutionMode, size: usize) -> Result<()> {
    match mode.available_tiers().into_iter().find(|t| !t.divides(size)) {
        Some(tier) => Err(BenchError::Config(format!(
            "diagnostic size {} is not a multiple of {} lanes",
            size,
            tier.lanes()
        ))),
        None => Ok(()),
    }
}

/// Dot product of two ramps at every unlocked tier.
///
/// Float tiers agree when they are within `ε · n · Σ|l·r|` of the scalar
/// result; integer tiers must match exactly.
pub fn dot_check<T: Element>(mode: ExecutionMode, len: usize) -> Result<Vec<TierCheck<T>>> {
    ensure_divisible(mode, len)?;
    let workload = DotWorkload::<T>::generate(len, Fill::Ramp, Fill::Ramp)?;
    let reference = kernels::dot(Tier::Scalar, workload.left(), workload.right());
    let bound = T::tolerance(len, workload.magnitude());

    Ok(mode
        .available_tiers()
        .into_iter()
        .map(|tier| {
            let result = kernels::dot(tier, workload.left(), workload.right());
            TierCheck {
                tier,
                backend: kernels::backend(tier),
                result,
                agrees: (result.to_f64() - reference.to_f64()).abs() <= bound,
            }
        })
        .collect())
}

/// `size × size` product of a matrix of 2s and a matrix of 3s at every
/// unlocked tier. Every tier performs the same per-element operations as
/// the scalar tier, so agreement is exact.
pub fn matmul_check<T: Element>(mode: ExecutionMode, size: usize) -> Result<Vec<TierCheck<Vec<T>>>> {
    ensure_divisible(mode, size)?;
    let mut workload = MatmulWorkload::<T>::generate(size, Fill::Constant(2), Fill::Constant(3))?;

    workload.reset();
    workload.execute(Tier::Scalar);
    let reference = workload.output().to_vec();

    let mut checks = Vec::new();
    for tier in mode.available_tiers() {
        workload.reset();
        workload.execute(tier);
        let result = workload.output().to_vec();
        checks.push(TierCheck {
            tier,
            backend: kernels::backend(tier),
            agrees: result == reference,
            result,
        });
    }
    Ok(checks)
}
