//! Error types for benchmark runs.

use thiserror::Error;

/// Errors that can abort a benchmark run.
///
/// Indivisible problem sizes are not errors: the driver skips them and logs.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Execution mode string not recognised.
    #[error("unrecognized execution mode `{0}` (expected baseline, avx, avx512, coreclr or llvm)")]
    UnknownMode(String),

    /// Invalid iteration, warm-up or size settings.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Workload requested with a zero problem size.
    #[error("problem size must be positive")]
    EmptyWorkload,

    /// Report file could not be written.
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchError>;
