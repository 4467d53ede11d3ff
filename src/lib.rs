//! Dot product and matrix multiplication across SIMD widths, plus the
//! harness that times them.
//!
//! Every kernel comes in four tiers: scalar, and 4, 8 or 16 f32 lanes at a
//! time. The question this crate answers is how run time scales with vector
//! width and problem size, and whether the tiers agree numerically.
//!
//! ## Usage
//!
//! ```
//! use simd_bench::kernels::{dot, Tier};
//!
//! let a: Vec<f32> = (0..1024).map(|i| (i % 100) as f32).collect();
//! let b = vec![2.0f32; 1024];
//!
//! let scalar = dot(Tier::Scalar, &a, &b);
//! let wide = dot(Tier::Width8, &a, &b);
//! assert!((scalar - wide).abs() <= f32::EPSILON * 1024.0 * scalar.abs());
//! ```
//!
//! Benchmarking a kernel family:
//!
//! ```
//! use simd_bench::harness::{BenchConfig, Driver, ExecutionMode};
//! use simd_bench::workload::{BenchmarkKind, Fill, MatmulWorkload};
//!
//! let mut config = BenchConfig::for_kind(BenchmarkKind::Matmul);
//! config.sizes = vec![16, 32];
//! config.warmup = 1;
//!
//! let driver = Driver::new(config, ExecutionMode::Avx).unwrap();
//! let reports = driver
//!     .run(|size| MatmulWorkload::<f32>::generate(size, Fill::Constant(2), Fill::Constant(3)))
//!     .unwrap();
//! assert_eq!(reports.full.len(), 2 * 4);
//! ```
//!
//! ## What's inside
//!
//! - Scalar reference kernels (sequential dot, i-k-j matmul)
//! - Portable 4/8/16-lane kernels with a fixed pairwise reduction
//! - SSE3, AVX and AVX-512F kernels that match the portable ones bit for bit
//! - Timing with warm-up discard, mean/stddev/standard error, CSV reports

pub mod error;
pub mod harness;
pub mod kernels;
pub mod matrix;
pub mod workload;

pub use error::{BenchError, Result};
pub use kernels::{Element, Tier, dot, matmul};
