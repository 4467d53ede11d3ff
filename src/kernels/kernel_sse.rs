//! 4-lane SSE3 kernels (one 128-bit register of f32).

use std::arch::x86_64::*;

/// Dot product over 4-lane strides, reduced with two `hadd`s.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE3
/// - `left.len() == right.len()` and the length is a multiple of 4
#[target_feature(enable = "sse3")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn dot_sse(left: &[f32], right: &[f32]) -> f32 {
    let mut acc = _mm_setzero_ps();
    for i in (0..left.len()).step_by(4) {
        let lv = _mm_loadu_ps(left.as_ptr().add(i));
        let rv = _mm_loadu_ps(right.as_ptr().add(i));
        acc = _mm_add_ps(_mm_mul_ps(lv, rv), acc);
    }

    acc = _mm_hadd_ps(acc, acc);
    acc = _mm_hadd_ps(acc, acc);
    _mm_cvtss_f32(acc)
}

/// i-k-j matmul, 4 columns of C per step.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports SSE3
/// - `a`, `b` and `c` hold `size * size` elements and `size` is a multiple of 4
#[target_feature(enable = "sse3")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matmul_sse(a: &[f32], b: &[f32], c: &mut [f32], size: usize) {
    let (ap, bp, cp) = (a.as_ptr(), b.as_ptr(), c.as_mut_ptr());

    for i in 0..size {
        for k in 0..size {
            // Broadcast a[i, k] once, reuse it across the whole row of B
            let sv = _mm_set1_ps(*ap.add(i * size + k));
            for j in (0..size).step_by(4) {
                let cv = _mm_loadu_ps(cp.add(i * size + j));
                let bv = _mm_loadu_ps(bp.add(k * size + j));
                _mm_storeu_ps(cp.add(i * size + j), _mm_add_ps(_mm_mul_ps(bv, sv), cv));
            }
        }
    }
}
