//! Benchmark harness: configuration, timing, statistics, the driver and
//! report output.
//!
//! Control flow per run: the driver builds one workload per comparable
//! size, the timing engine runs it for each unlocked tier, samples reduce to
//! a [`stats::Summary`], and each summary becomes a [`report::Record`].

pub mod config;
pub mod diag;
pub mod driver;
pub mod report;
pub mod stats;
pub mod timing;

pub use config::{BenchConfig, ExecutionMode};
pub use driver::{Driver, RunReports, is_comparable};
pub use report::{Record, Report, Schema};
pub use stats::Summary;
pub use timing::{MonotonicStopwatch, Stopwatch, TimeUnit, TimingPlan, measure, timer_resolution};
