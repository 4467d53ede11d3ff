//! 8-lane AVX kernels (one 256-bit register of f32).

use std::arch::x86_64::*;

/// Folds the high 128 bits onto the low 128 bits, then two `hadd`s.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub(crate) unsafe fn reduce_256(v: __m256) -> f32 {
    let lo = _mm256_castps256_ps128(v);
    let hi = _mm256_extractf128_ps(v, 1);
    let mut res = _mm_add_ps(lo, hi);
    res = _mm_hadd_ps(res, res);
    res = _mm_hadd_ps(res, res);
    _mm_cvtss_f32(res)
}

/// Dot product over 8-lane strides.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `left.len() == right.len()` and the length is a multiple of 8
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn dot_avx(left: &[f32], right: &[f32]) -> f32 {
    let mut acc = _mm256_setzero_ps();
    for i in (0..left.len()).step_by(8) {
        let lv = _mm256_loadu_ps(left.as_ptr().add(i));
        let rv = _mm256_loadu_ps(right.as_ptr().add(i));
        acc = _mm256_add_ps(_mm256_mul_ps(lv, rv), acc);
    }
    reduce_256(acc)
}

/// i-k-j matmul, 8 columns of C per step.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX
/// - `a`, `b` and `c` hold `size * size` elements and `size` is a multiple of 8
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matmul_avx(a: &[f32], b: &[f32], c: &mut [f32], size: usize) {
    let (ap, bp, cp) = (a.as_ptr(), b.as_ptr(), c.as_mut_ptr());

    for i in 0..size {
        for k in 0..size {
            let sv = _mm256_set1_ps(*ap.add(i * size + k));
            for j in (0..size).step_by(8) {
                let cv = _mm256_loadu_ps(cp.add(i * size + j));
                let bv = _mm256_loadu_ps(bp.add(k * size + j));
                _mm256_storeu_ps(cp.add(i * size + j), _mm256_add_ps(_mm256_mul_ps(bv, sv), cv));
            }
        }
    }
}
