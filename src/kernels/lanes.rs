//! Portable fixed-width lanes.
//!
//! `Lanes<T, W>` is a plain `[T; W]` that behaves like a W-wide vector
//! register. The kernels written against it are what runs when the CPU has
//! no native encoding for a tier, and they are the reference the native
//! backends must match bit for bit.

use std::fmt;

use super::Tier;

/// Numeric element a kernel can operate on.
///
/// `i32` arithmetic wraps, so every tier sums to exactly the same value no
/// matter the accumulation order. `f32` uses separate multiply and add
/// (never FMA), so a tier's native and portable results agree exactly.
pub trait Element:
    Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const ZERO: Self;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;

    /// Converts a small integer used to fill buffers.
    fn from_i32(v: i32) -> Self;

    fn to_f64(self) -> f64;

    /// Largest difference between two tiers that still counts as agreement
    /// for a reduction over `n` terms whose absolute sum is `magnitude`.
    fn tolerance(n: usize, magnitude: f64) -> f64;

    /// Native dot product for `tier`, or `None` when no native encoding
    /// exists for this element type on the running CPU.
    fn native_dot(_tier: Tier, _left: &[Self], _right: &[Self]) -> Option<Self> {
        None
    }

    /// Native matmul for `tier`. Returns `false` when nothing ran.
    fn native_matmul(_tier: Tier, _a: &[Self], _b: &[Self], _c: &mut [Self], _size: usize) -> bool {
        false
    }
}

impl Element for f32 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline(always)]
    fn lane_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn from_i32(v: i32) -> Self {
        v as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn tolerance(n: usize, magnitude: f64) -> f64 {
        f32::EPSILON as f64 * n.max(1) as f64 * magnitude
    }

    fn native_dot(tier: Tier, left: &[f32], right: &[f32]) -> Option<f32> {
        super::native::dot_f32(tier, left, right)
    }

    fn native_matmul(tier: Tier, a: &[f32], b: &[f32], c: &mut [f32], size: usize) -> bool {
        super::native::matmul_f32(tier, a, b, c, size)
    }
}

impl Element for i32 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn lane_add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline(always)]
    fn lane_mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn from_i32(v: i32) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn tolerance(_n: usize, _magnitude: f64) -> f64 {
        0.0
    }
}

/// W lanes of `T`. W is a power of two.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lanes<T, const W: usize>([T; W]);

impl<T: Element, const W: usize> Lanes<T, W> {
    #[inline(always)]
    pub fn zero() -> Self {
        Self([T::ZERO; W])
    }

    #[inline(always)]
    pub fn splat(v: T) -> Self {
        Self([v; W])
    }

    pub fn from_array(lanes: [T; W]) -> Self {
        Self(lanes)
    }

    pub fn to_array(self) -> [T; W] {
        self.0
    }

    /// Loads the first W elements of `src`.
    #[inline(always)]
    pub fn load(src: &[T]) -> Self {
        let mut lanes = [T::ZERO; W];
        lanes.copy_from_slice(&src[..W]);
        Self(lanes)
    }

    #[inline(always)]
    pub fn store(self, dst: &mut [T]) {
        dst[..W].copy_from_slice(&self.0);
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].lane_add(rhs.0[i])))
    }

    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].lane_mul(rhs.0[i])))
    }

    /// Horizontal sum by pairwise folding.
    ///
    /// Above four lanes the upper half is folded onto the lower half (what
    /// extracting and adding the high 256/128-bit halves does). The last
    /// four lanes are reduced with two adjacent-pair steps, matching two
    /// `hadd` instructions: `(l0 + l1) + (l2 + l3)`.
    pub fn reduce_sum(self) -> T {
        debug_assert!(W.is_power_of_two());
        let mut lanes = self.0;
        let mut width = W;

        while width > 4 {
            let half = width / 2;
            for i in 0..half {
                lanes[i] = lanes[i].lane_add(lanes[i + half]);
            }
            width = half;
        }

        while width > 1 {
            let half = width / 2;
            for i in 0..half {
                lanes[i] = lanes[2 * i].lane_add(lanes[2 * i + 1]);
            }
            width = half;
        }

        lanes[0]
    }
}

/// W-wide dot product. `left.len()` must be a multiple of W.
pub fn dot_lanes<T: Element, const W: usize>(left: &[T], right: &[T]) -> T {
    let mut acc = Lanes::<T, W>::zero();
    for (l, r) in left.chunks_exact(W).zip(right.chunks_exact(W)) {
        acc = Lanes::load(l).mul(Lanes::load(r)).add(acc);
    }
    acc.reduce_sum()
}

/// W-wide i-k-j matmul: C += A * B for square `size × size` matrices.
///
/// `a[i, k]` is broadcast and multiplied into W columns of B's row k at a
/// time, accumulating into the same columns of C's row i.
pub fn matmul_lanes<T: Element, const W: usize>(a: &[T], b: &[T], c: &mut [T], size: usize) {
    for i in 0..size {
        let c_row = &mut c[i * size..(i + 1) * size];
        for k in 0..size {
            let sv = Lanes::<T, W>::splat(a[i * size + k]);
            let b_row = &b[k * size..(k + 1) * size];
            for (cc, bc) in c_row.chunks_exact_mut(W).zip(b_row.chunks_exact(W)) {
                Lanes::load(bc).mul(sv).add(Lanes::load(cc)).store(cc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_sum_four_lanes_is_adjacent_pairs() {
        let v = Lanes::<i32, 4>::from_array([1, 2, 3, 4]);
        assert_eq!(v.reduce_sum(), 10);

        // 1e8 + 1 rounds away in f32, so the fold order is observable.
        let f = Lanes::<f32, 4>::from_array([1.0e8, 1.0, -1.0e8, 1.0]);
        let expected = (1.0e8f32 + 1.0) + (-1.0e8f32 + 1.0);
        assert_eq!(f.reduce_sum(), expected);
    }

    #[test]
    fn test_reduce_sum_folds_halves_first() {
        let lanes: [f32; 8] = [1.0e8, 3.0, 1.0, 2.0, -1.0e8, 5.0, 7.0, 11.0];
        let v = Lanes::<f32, 8>::from_array(lanes);

        let folded: [f32; 4] = std::array::from_fn(|i| lanes[i] + lanes[i + 4]);
        let expected = (folded[0] + folded[1]) + (folded[2] + folded[3]);
        assert_eq!(v.reduce_sum(), expected);
    }

    #[test]
    fn test_reduce_sum_sixteen_lanes() {
        let v = Lanes::<i32, 16>::from_array(std::array::from_fn(|i| i as i32));
        assert_eq!(v.reduce_sum(), (0..16).sum::<i32>());
    }

    #[test]
    fn test_splat_load_store() {
        let src = [1, 2, 3, 4, 5];
        let v = Lanes::<i32, 4>::load(&src);
        assert_eq!(v.to_array(), [1, 2, 3, 4]);

        let mut dst = [0; 6];
        v.mul(Lanes::splat(2)).store(&mut dst[1..]);
        assert_eq!(dst, [0, 2, 4, 6, 8, 0]);
    }

    #[test]
    fn test_i32_lanes_wrap() {
        assert_eq!(i32::MAX.lane_add(1), i32::MIN);
        assert_eq!((1i32 << 30).lane_mul(4), 0);
    }
}
