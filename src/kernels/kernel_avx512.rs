//! 16-lane AVX-512 kernels (one 512-bit register of f32).
//!
//! Only AVX-512F is required. The reduction does not use
//! `_mm512_reduce_add_ps`, whose internal order is unspecified; it folds
//! 512 → 256 → 128 bits and finishes with two `hadd`s so the result matches
//! the portable 16-lane kernel exactly.

use std::arch::x86_64::*;

use super::kernel_avx::reduce_256;

#[target_feature(enable = "avx512f")]
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn reduce_512(v: __m512) -> f32 {
    let lo = _mm512_castps512_ps256(v);
    let hi = _mm256_castpd_ps(_mm512_extractf64x4_pd(_mm512_castps_pd(v), 1));
    reduce_256(_mm256_add_ps(lo, hi))
}

/// Dot product over 16-lane strides.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX-512F
/// - `left.len() == right.len()` and the length is a multiple of 16
#[target_feature(enable = "avx512f")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn dot_avx512(left: &[f32], right: &[f32]) -> f32 {
    let mut acc = _mm512_setzero_ps();
    for i in (0..left.len()).step_by(16) {
        let lv = _mm512_loadu_ps(left.as_ptr().add(i));
        let rv = _mm512_loadu_ps(right.as_ptr().add(i));
        acc = _mm512_add_ps(_mm512_mul_ps(lv, rv), acc);
    }
    reduce_512(acc)
}

/// i-k-j matmul, 16 columns of C per step.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX-512F
/// - `a`, `b` and `c` hold `size * size` elements and `size` is a multiple of 16
#[target_feature(enable = "avx512f")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matmul_avx512(a: &[f32], b: &[f32], c: &mut [f32], size: usize) {
    let (ap, bp, cp) = (a.as_ptr(), b.as_ptr(), c.as_mut_ptr());

    for i in 0..size {
        for k in 0..size {
            let sv = _mm512_set1_ps(*ap.add(i * size + k));
            for j in (0..size).step_by(16) {
                let cv = _mm512_loadu_ps(cp.add(i * size + j));
                let bv = _mm512_loadu_ps(bp.add(k * size + j));
                _mm512_storeu_ps(cp.add(i * size + j), _mm512_add_ps(_mm512_mul_ps(bv, sv), cv));
            }
        }
    }
}
