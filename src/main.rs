//! Benchmark runner for the multi-width kernels.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use simd_bench::harness::diag::{self, DIAG_DOT_LEN, DIAG_MATRIX_SIZE};
use simd_bench::harness::{BenchConfig, Driver, ExecutionMode, RunReports, Schema, timer_resolution};
use simd_bench::workload::{BenchmarkKind, DotWorkload, MatmulWorkload};
use simd_bench::{Element, kernels};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "simd-bench")]
#[command(about = "Time dot product and matmul across scalar and 4/8/16-lane SIMD", long_about = None)]
#[command(version)]
struct Cli {
    /// Kernel to benchmark
    #[arg(value_enum)]
    kind: Kind,

    /// `diag` checks tiers agree, `bench` times them
    #[arg(value_enum)]
    action: Action,

    /// Which wide tier to unlock: baseline, avx (8 lanes) or avx512 (16 lanes)
    mode: ExecutionMode,

    /// Retained timing trials per tier (bench only)
    iterations: Option<usize>,

    /// Element type of the buffers
    #[arg(long, value_enum, default_value = "f32")]
    element: ElementKind,

    /// Problem sizes, overriding the defaults for the kernel
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Warm-up trials discarded before recording
    #[arg(long)]
    warmup: Option<usize>,

    /// Kernel calls per timed trial
    #[arg(long)]
    inner: Option<usize>,

    /// Write the 4-column `name,size,mean,stddev` layout
    #[arg(long)]
    legacy: bool,

    /// Directory for the CSV reports
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Dot,
    Matmul,
}

impl From<Kind> for BenchmarkKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Dot => BenchmarkKind::Dot,
            Kind::Matmul => BenchmarkKind::Matmul,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    Diag,
    Bench,
}

#[derive(Clone, Copy, ValueEnum)]
enum ElementKind {
    F32,
    I32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let kind = BenchmarkKind::from(cli.kind);

    match (cli.action, cli.element) {
        (Action::Diag, ElementKind::F32) => run_diag::<f32>(kind, cli.mode),
        (Action::Diag, ElementKind::I32) => run_diag::<i32>(kind, cli.mode),
        (Action::Bench, element) => {
            let config = build_config(&cli, kind)?;
            let driver = Driver::new(config, cli.mode)?;
            let reports = match element {
                ElementKind::F32 => run_bench::<f32>(&driver, kind)?,
                ElementKind::I32 => run_bench::<i32>(&driver, kind)?,
            };
            write_reports(&reports, kind, &cli.out_dir)
        }
    }
}

fn build_config(cli: &Cli, kind: BenchmarkKind) -> anyhow::Result<BenchConfig> {
    let Some(iterations) = cli.iterations else {
        bail!("bench needs an iteration count");
    };

    let mut config = BenchConfig::for_kind(kind);
    config.iterations = iterations;
    if let Some(sizes) = &cli.sizes {
        config.sizes = sizes.clone();
    }
    if let Some(warmup) = cli.warmup {
        config.warmup = warmup;
    }
    if let Some(inner) = cli.inner {
        config.inner_repetitions = inner;
    }
    if cli.legacy {
        config.schema = Schema::Legacy;
    }
    config.validate()?;
    Ok(config)
}

fn run_bench<T: Element>(driver: &Driver, kind: BenchmarkKind) -> anyhow::Result<RunReports> {
    info!(resolution = ?timer_resolution(), "using monotonic timer");
    for tier in driver.mode().available_tiers() {
        info!(tier = %tier, backend = kernels::backend(tier), "tier available");
    }

    let (left, right) = kind.default_fills();
    let reports = match kind {
        BenchmarkKind::Dot => driver.run(|size| DotWorkload::<T>::generate(size, left, right))?,
        BenchmarkKind::Matmul => driver.run(|size| MatmulWorkload::<T>::generate(size, left, right))?,
    };
    Ok(reports)
}

fn write_reports(reports: &RunReports, kind: BenchmarkKind, out_dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let pre = out_dir.join(format!("{}-pre.csv", kind.name()));
    let full = out_dir.join(format!("{}-results.csv", kind.name()));
    reports.preflight.save(&pre).with_context(|| format!("writing {}", pre.display()))?;
    reports.full.save(&full).with_context(|| format!("writing {}", full.display()))?;

    println!("Wrote {} and {}", pre.display(), full.display());
    if !reports.skipped.is_empty() {
        println!("Skipped sizes: {:?}", reports.skipped);
    }
    Ok(())
}

fn run_diag<T: Element>(kind: BenchmarkKind, mode: ExecutionMode) -> anyhow::Result<()> {
    match kind {
        BenchmarkKind::Dot => {
            for check in diag::dot_check::<T>(mode, DIAG_DOT_LEN)? {
                println!(
                    "{:10} {:9} {:>16}  {}",
                    check.tier.tag(),
                    check.backend,
                    check.result,
                    if check.agrees { "ok" } else { "MISMATCH" }
                );
            }
        }
        BenchmarkKind::Matmul => {
            for check in diag::matmul_check::<T>(mode, DIAG_MATRIX_SIZE)? {
                println!(
                    "== {} ({}) {} ==",
                    check.tier.tag(),
                    check.backend,
                    if check.agrees { "ok" } else { "MISMATCH" }
                );
                for row in check.result.chunks(DIAG_MATRIX_SIZE) {
                    let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                    println!("{}", line.join(" "));
                }
            }
        }
    }
    Ok(())
}
