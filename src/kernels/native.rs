//! Native instruction-set backends for f32.
//!
//! A tier runs natively only when the CPU reports the matching feature;
//! otherwise the caller falls back to the portable lanes of the same width.

use super::Tier;

/// Instruction set a tier's native kernel needs, if it has one.
pub(crate) fn required_feature(tier: Tier) -> Option<&'static str> {
    match tier {
        Tier::Scalar => None,
        Tier::Width4 => Some("sse3"),
        Tier::Width8 => Some("avx"),
        Tier::Width16 => Some("avx512f"),
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn has_native(tier: Tier) -> bool {
    match tier {
        Tier::Scalar => false,
        Tier::Width4 => is_x86_feature_detected!("sse3"),
        Tier::Width8 => is_x86_feature_detected!("avx"),
        Tier::Width16 => is_x86_feature_detected!("avx512f"),
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn has_native(_tier: Tier) -> bool {
    false
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn dot_f32(tier: Tier, left: &[f32], right: &[f32]) -> Option<f32> {
    use super::{kernel_avx, kernel_avx512, kernel_sse};

    if !has_native(tier) {
        return None;
    }
    // Lengths and divisibility were checked by `kernels::dot`.
    unsafe {
        match tier {
            Tier::Scalar => None,
            Tier::Width4 => Some(kernel_sse::dot_sse(left, right)),
            Tier::Width8 => Some(kernel_avx::dot_avx(left, right)),
            Tier::Width16 => Some(kernel_avx512::dot_avx512(left, right)),
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn dot_f32(_tier: Tier, _left: &[f32], _right: &[f32]) -> Option<f32> {
    None
}

#[cfg(target_arch = "x86_64")]
pub(crate) fn matmul_f32(tier: Tier, a: &[f32], b: &[f32], c: &mut [f32], size: usize) -> bool {
    use super::{kernel_avx, kernel_avx512, kernel_sse};

    if !has_native(tier) {
        return false;
    }
    unsafe {
        match tier {
            Tier::Scalar => return false,
            Tier::Width4 => kernel_sse::matmul_sse(a, b, c, size),
            Tier::Width8 => kernel_avx::matmul_avx(a, b, c, size),
            Tier::Width16 => kernel_avx512::matmul_avx512(a, b, c, size),
        }
    }
    true
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn matmul_f32(_tier: Tier, _a: &[f32], _b: &[f32], _c: &mut [f32], _size: usize) -> bool {
    false
}
