//! Deterministic input buffers for the kernels.
//!
//! Buffers are allocated once per (benchmark, size) and reused for every
//! tier and every timing trial, so nothing is allocated inside a timed
//! region. Content is either a constant or an index ramp; no seeds needed.

use std::hint::black_box;

use crate::error::{BenchError, Result};
use crate::kernels::{self, Element, Tier};

/// Period of the index ramp.
pub const RAMP_PERIOD: usize = 100;

/// How a buffer is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Every element equals the value.
    Constant(i32),
    /// Element `i` is `i % RAMP_PERIOD`.
    Ramp,
}

impl Fill {
    pub fn build<T: Element>(self, len: usize) -> Vec<T> {
        match self {
            Fill::Constant(v) => vec![T::from_i32(v); len],
            Fill::Ramp => (0..len).map(|i| T::from_i32((i % RAMP_PERIOD) as i32)).collect(),
        }
    }
}

/// Which kernel a benchmark drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkKind {
    Dot,
    Matmul,
}

impl BenchmarkKind {
    pub const fn name(self) -> &'static str {
        match self {
            BenchmarkKind::Dot => "dot",
            BenchmarkKind::Matmul => "matmul",
        }
    }

    /// Default operand fills: ramps for dot, constants 2 and 3 for matmul.
    pub const fn default_fills(self) -> (Fill, Fill) {
        match self {
            BenchmarkKind::Dot => (Fill::Ramp, Fill::Ramp),
            BenchmarkKind::Matmul => (Fill::Constant(2), Fill::Constant(3)),
        }
    }
}

/// Something the timing engine can invoke repeatedly.
pub trait Workload {
    /// Problem size this workload was built for.
    fn size(&self) -> usize;

    /// Restores the state a fresh invocation expects. Called once per
    /// timing trial, outside the timed region.
    fn reset(&mut self) {}

    /// Runs the kernel once at `tier`.
    fn execute(&mut self, tier: Tier);
}

/// Two equal-length vectors for the dot product.
#[derive(Debug, Clone)]
pub struct DotWorkload<T> {
    left: Vec<T>,
    right: Vec<T>,
    last: Option<T>,
}

impl<T: Element> DotWorkload<T> {
    pub fn generate(len: usize, left: Fill, right: Fill) -> Result<Self> {
        if len == 0 {
            return Err(BenchError::EmptyWorkload);
        }
        Ok(Self {
            left: left.build(len),
            right: right.build(len),
            last: None,
        })
    }

    pub fn left(&self) -> &[T] {
        &self.left
    }

    pub fn right(&self) -> &[T] {
        &self.right
    }

    /// Result of the most recent `execute`.
    pub fn last_result(&self) -> Option<T> {
        self.last
    }

    /// Sum of `|left[i] * right[i]|`, the scale of the rounding error.
    pub fn magnitude(&self) -> f64 {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(l, r)| (l.to_f64() * r.to_f64()).abs())
            .sum()
    }
}

impl<T: Element> Workload for DotWorkload<T> {
    fn size(&self) -> usize {
        self.left.len()
    }

    fn execute(&mut self, tier: Tier) {
        let result = kernels::dot(tier, black_box(&self.left), black_box(&self.right));
        self.last = Some(black_box(result));
    }
}

/// Square operands A and B plus the output C, all `size × size`.
#[derive(Debug, Clone)]
pub struct MatmulWorkload<T> {
    size: usize,
    a: Vec<T>,
    b: Vec<T>,
    c: Vec<T>,
}

impl<T: Element> MatmulWorkload<T> {
    pub fn generate(size: usize, a: Fill, b: Fill) -> Result<Self> {
        if size == 0 {
            return Err(BenchError::EmptyWorkload);
        }
        let len = size
            .checked_mul(size)
            .ok_or_else(|| BenchError::Config(format!("matrix size {} overflows", size)))?;
        Ok(Self {
            size,
            a: a.build(len),
            b: b.build(len),
            c: vec![T::ZERO; len],
        })
    }

    pub fn a(&self) -> &[T] {
        &self.a
    }

    pub fn b(&self) -> &[T] {
        &self.b
    }

    /// Output matrix C, row-major.
    pub fn output(&self) -> &[T] {
        &self.c
    }

    /// Row `i` of C.
    pub fn output_row(&self, i: usize) -> &[T] {
        &self.c[i * self.size..(i + 1) * self.size]
    }
}

impl<T: Element> Workload for MatmulWorkload<T> {
    fn size(&self) -> usize {
        self.size
    }

    fn reset(&mut self) {
        self.c.fill(T::ZERO);
    }

    fn execute(&mut self, tier: Tier) {
        kernels::matmul(tier, black_box(&self.a), black_box(&self.b), &mut self.c, self.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_deterministic() {
        let ramp: Vec<f32> = Fill::Ramp.build(205);
        assert_eq!(ramp[0], 0.0);
        assert_eq!(ramp[99], 99.0);
        assert_eq!(ramp[100], 0.0);
        assert_eq!(ramp[204], 4.0);
        assert_eq!(ramp, Fill::Ramp.build::<f32>(205));

        let constant: Vec<i32> = Fill::Constant(3).build(4);
        assert_eq!(constant, vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            DotWorkload::<f32>::generate(0, Fill::Ramp, Fill::Ramp),
            Err(BenchError::EmptyWorkload)
        ));
        assert!(matches!(
            MatmulWorkload::<i32>::generate(0, Fill::Constant(2), Fill::Constant(3)),
            Err(BenchError::EmptyWorkload)
        ));
    }

    #[test]
    fn test_matmul_reset_zeroes_output() {
        let mut w = MatmulWorkload::<f32>::generate(16, Fill::Constant(2), Fill::Constant(3)).unwrap();
        w.execute(Tier::Width4);
        assert!(w.output().iter().all(|&v| v == 96.0));

        w.reset();
        assert!(w.output().iter().all(|&v| v == 0.0));
        assert_eq!(w.a().len(), 256);
    }

    #[test]
    fn test_dot_keeps_last_result() {
        let mut w = DotWorkload::<i32>::generate(8, Fill::Constant(2), Fill::Constant(2)).unwrap();
        assert_eq!(w.last_result(), None);
        w.execute(Tier::Width8);
        assert_eq!(w.last_result(), Some(32));
        assert_eq!(w.magnitude(), 32.0);
    }
}
