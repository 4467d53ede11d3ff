//! The multi-width kernel family.
//!
//! Every operation comes in four tiers that differ only in how many f32
//! lanes they process per step:
//! - `Scalar`: one element at a time (the reference)
//! - `Width4`: 128-bit, SSE3 natively
//! - `Width8`: 256-bit, AVX natively
//! - `Width16`: 512-bit, AVX-512F natively
//!
//! [`dot`] and [`matmul`] are the safe entry points. They check buffer
//! shapes and then run the native kernel for the tier when the CPU has one,
//! or the portable [`lanes`] kernel of the same width when it doesn't.

#[cfg(target_arch = "x86_64")]
pub mod kernel_avx;
#[cfg(target_arch = "x86_64")]
pub mod kernel_avx512;
#[cfg(target_arch = "x86_64")]
pub mod kernel_sse;
pub mod lanes;
mod native;

use std::fmt;

use crate::matrix::naive_ikj::{dot_scalar, matmul_naive_ikj};

pub use lanes::{Element, Lanes, dot_lanes, matmul_lanes};

/// Data-parallel execution width, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Scalar,
    Width4,
    Width8,
    Width16,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Scalar, Tier::Width4, Tier::Width8, Tier::Width16];

    /// f32 lanes processed per step.
    pub const fn lanes(self) -> usize {
        match self {
            Tier::Scalar => 1,
            Tier::Width4 => 4,
            Tier::Width8 => 8,
            Tier::Width16 => 16,
        }
    }

    /// Short name used as the report's kernel tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Tier::Scalar => "NoVector",
            Tier::Width4 => "Vector128",
            Tier::Width8 => "Vector256",
            Tier::Width16 => "Vector512",
        }
    }

    pub fn divides(self, len: usize) -> bool {
        len % self.lanes() == 0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which implementation a tier resolves to for f32 on this CPU.
pub fn backend(tier: Tier) -> &'static str {
    if tier == Tier::Scalar {
        return "scalar";
    }
    if native::has_native(tier) {
        native::required_feature(tier).unwrap_or("portable")
    } else {
        "portable"
    }
}

/// Dot product of `left` and `right` at the given tier.
///
/// # Panics
///
/// Panics if the lengths differ or the length is not a multiple of the
/// tier's lane count.
pub fn dot<T: Element>(tier: Tier, left: &[T], right: &[T]) -> T {
    assert_eq!(left.len(), right.len(), "dot: operand lengths differ");
    assert!(
        tier.divides(left.len()),
        "dot: length {} is not a multiple of {} lanes",
        left.len(),
        tier.lanes()
    );

    if tier != Tier::Scalar {
        if let Some(result) = T::native_dot(tier, left, right) {
            return result;
        }
    }
    portable_dot(tier, left, right)
}

/// Dot product using only the portable lanes, never a native backend.
pub fn portable_dot<T: Element>(tier: Tier, left: &[T], right: &[T]) -> T {
    match tier {
        Tier::Scalar => dot_scalar(left, right),
        Tier::Width4 => dot_lanes::<T, 4>(left, right),
        Tier::Width8 => dot_lanes::<T, 8>(left, right),
        Tier::Width16 => dot_lanes::<T, 16>(left, right),
    }
}

/// Matrix multiply C += A * B for square `size × size` row-major matrices.
///
/// C is accumulated into, so callers zero it first for a fresh product.
///
/// # Panics
///
/// Panics if a buffer doesn't hold `size * size` elements or `size` is not
/// a multiple of the tier's lane count.
pub fn matmul<T: Element>(tier: Tier, a: &[T], b: &[T], c: &mut [T], size: usize) {
    let len = size * size;
    assert_eq!(a.len(), len, "A: expected {}x{}={} elements", size, size, len);
    assert_eq!(b.len(), len, "B: expected {}x{}={} elements", size, size, len);
    assert_eq!(c.len(), len, "C: expected {}x{}={} elements", size, size, len);
    assert!(
        tier.divides(size),
        "matmul: size {} is not a multiple of {} lanes",
        size,
        tier.lanes()
    );

    if tier != Tier::Scalar && T::native_matmul(tier, a, b, c, size) {
        return;
    }
    portable_matmul(tier, a, b, c, size);
}

/// Matmul using only the portable lanes.
pub fn portable_matmul<T: Element>(tier: Tier, a: &[T], b: &[T], c: &mut [T], size: usize) {
    match tier {
        Tier::Scalar => matmul_naive_ikj(a, b, c, size),
        Tier::Width4 => matmul_lanes::<T, 4>(a, b, c, size),
        Tier::Width8 => matmul_lanes::<T, 8>(a, b, c, size),
        Tier::Width16 => matmul_lanes::<T, 16>(a, b, c, size),
    }
}
