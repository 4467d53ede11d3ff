use crate::kernels::Element;

/// Cache-friendly matrix multiplication using i-k-j loop order.
///
/// The innermost loop walks B's row k and C's row i with stride 1, which is
/// what lets the vector tiers replace it with W-wide chunks. For a fixed
/// (i, k) every element does `c + a * b`, the same two roundings the vector
/// tiers perform, so all tiers produce identical matrices.
///
/// This is the scalar baseline the SIMD tiers are compared against.
///
/// # Arguments
///
/// * `a` - Matrix A (size × size), row-major
/// * `b` - Matrix B (size × size), row-major
/// * `c` - Matrix C (size × size), row-major, accumulated into (C += A * B)
/// * `size` - Rows and columns of every matrix
pub fn matmul_naive_ikj<T: Element>(a: &[T], b: &[T], c: &mut [T], size: usize) {
    for i in 0..size {
        for k in 0..size {
            let aik = a[i * size + k];
            for j in 0..size {
                c[i * size + j] = c[i * size + j].lane_add(aik.lane_mul(b[k * size + j]));
            }
        }
    }
}

/// Sequential dot product: `result += left[i] * right[i]` in index order.
///
/// Reference result for the vector tiers, which sum in a different order.
pub fn dot_scalar<T: Element>(left: &[T], right: &[T]) -> T {
    let mut result = T::ZERO;
    for (&l, &r) in left.iter().zip(right) {
        result = result.lane_add(l.lane_mul(r));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x2_multiply() {
        let a = vec![1.0f32, 2.0, 3.0, 4.0];
        let b = vec![5.0f32, 6.0, 7.0, 8.0];
        let mut c = vec![0.0f32; 4];

        matmul_naive_ikj(&a, &b, &mut c, 2);

        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_accumulates_into_c() {
        let a = vec![1i32; 9];
        let b = vec![2i32; 9];
        let mut c = vec![5i32; 9];

        matmul_naive_ikj(&a, &b, &mut c, 3);

        assert!(c.iter().all(|&v| v == 5 + 6), "Should accumulate, not overwrite");
    }

    #[test]
    fn test_dot_scalar() {
        let left = [1, 2, 3, 4];
        let right = [5, 6, 7, 8];
        assert_eq!(dot_scalar(&left, &right), 70);
        assert_eq!(dot_scalar::<f32>(&[], &[]), 0.0);
    }
}
