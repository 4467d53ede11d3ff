use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use simd_bench::harness::{
    BenchConfig, Driver, ExecutionMode, Report, Schema, Stopwatch, Summary, TimeUnit, TimingPlan, measure,
};
use simd_bench::kernels::Tier;
use simd_bench::workload::{BenchmarkKind, DotWorkload, Fill, MatmulWorkload, Workload};
use simd_bench::{BenchError, Result};

/// Stopwatch that replays scripted trial durations.
struct ScriptedStopwatch {
    durations: VecDeque<Duration>,
}

impl ScriptedStopwatch {
    fn millis(values: &[u64]) -> Self {
        Self {
            durations: values.iter().map(|&ms| Duration::from_millis(ms)).collect(),
        }
    }
}

impl Stopwatch for ScriptedStopwatch {
    fn start(&mut self) {}

    fn stop(&mut self) -> Duration {
        self.durations.pop_front().unwrap_or(Duration::from_millis(1))
    }
}

/// Workload that only counts calls.
#[derive(Default)]
struct Counting {
    size: usize,
    calls: Rc<RefCell<Vec<(usize, Tier)>>>,
    resets: usize,
}

impl Workload for Counting {
    fn size(&self) -> usize {
        self.size
    }

    fn reset(&mut self) {
        self.resets += 1;
    }

    fn execute(&mut self, tier: Tier) {
        self.calls.borrow_mut().push((self.size, tier));
    }
}

fn small_config(sizes: Vec<usize>, iterations: usize, warmup: usize) -> BenchConfig {
    let mut config = BenchConfig::for_kind(BenchmarkKind::Dot);
    config.sizes = sizes;
    config.iterations = iterations;
    config.warmup = warmup;
    config.inner_repetitions = 1;
    config
}

fn render(report: &Report) -> String {
    let mut out = Vec::new();
    report.write_csv(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// ============================================================
// Timing & statistics
// ============================================================

#[test]
fn test_warmup_trials_are_discarded() {
    let plan = TimingPlan::new(1, 5, 2, TimeUnit::Millis).unwrap();
    let mut stopwatch = ScriptedStopwatch::millis(&[100, 200, 3, 4, 5]);
    let mut workload = Counting::default();

    let samples = measure(&mut workload, Tier::Scalar, &plan, &mut stopwatch);

    assert_eq!(samples.len(), 3);
    assert_eq!(samples, vec![3.0, 4.0, 5.0], "must keep the last 3 trials, not the first");
    assert_eq!(workload.calls.borrow().len(), 5, "warm-up trials still run the kernel");
    assert_eq!(workload.resets, 5);
}

#[test]
fn test_inner_repetitions_average_each_trial() {
    let plan = TimingPlan::new(4, 3, 1, TimeUnit::Micros).unwrap();
    let mut stopwatch = ScriptedStopwatch::millis(&[1, 2, 4]);
    let mut workload = Counting::default();

    let samples = measure(&mut workload, Tier::Width4, &plan, &mut stopwatch);

    assert_eq!(samples, vec![500.0, 1000.0]);
    assert_eq!(workload.calls.borrow().len(), 12);
}

#[test]
fn test_summary_of_one_two_three() {
    let s = Summary::from_samples(&[1.0, 2.0, 3.0]).unwrap();
    assert!((s.mean - 2.0).abs() < 1e-12);
    assert!((s.stddev - 1.0).abs() < 1e-12);
    assert!((s.std_error - 1.0 / 3f64.sqrt()).abs() < 1e-12);
}

// ============================================================
// Driver
// ============================================================

#[test]
fn test_indivisible_sizes_never_reach_the_kernel() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut built = Vec::new();

    let driver = Driver::new(small_config(vec![12, 16, 40, 32], 2, 1), ExecutionMode::Avx512).unwrap();
    let reports = driver
        .run_with(
            |size| {
                built.push(size);
                Ok(Counting {
                    size,
                    calls: Rc::clone(&calls),
                    resets: 0,
                })
            },
            &mut ScriptedStopwatch::millis(&[]),
        )
        .unwrap();

    assert_eq!(reports.skipped, vec![12, 40]);
    assert_eq!(built, vec![16, 32]);
    assert!(calls.borrow().iter().all(|(size, _)| *size == 16 || *size == 32));
    assert!(reports.full.records().iter().all(|r| r.size == 16 || r.size == 32));
}

#[test]
fn test_width8_mode_still_requires_width16_divisibility() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let driver = Driver::new(small_config(vec![8, 24], 1, 0), ExecutionMode::Avx).unwrap();

    let reports = driver
        .run_with(
            |size| {
                Ok(Counting {
                    size,
                    calls: Rc::clone(&calls),
                    resets: 0,
                })
            },
            &mut ScriptedStopwatch::millis(&[]),
        )
        .unwrap();

    assert_eq!(reports.skipped, vec![8, 24]);
    assert!(calls.borrow().is_empty());
    assert!(reports.full.is_empty());
}

#[test]
fn test_locked_tiers_are_not_invoked() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let driver = Driver::new(small_config(vec![16], 3, 1), ExecutionMode::Baseline).unwrap();

    let reports = driver
        .run_with(
            |size| {
                Ok(Counting {
                    size,
                    calls: Rc::clone(&calls),
                    resets: 0,
                })
            },
            &mut ScriptedStopwatch::millis(&[]),
        )
        .unwrap();

    assert!(
        calls
            .borrow()
            .iter()
            .all(|(_, tier)| matches!(tier, Tier::Scalar | Tier::Width4))
    );
    // pre-flight: 1 + 1 trials, full: 3 + 1 trials, for two tiers
    assert_eq!(calls.borrow().len(), 2 * (2 + 4));

    let tags: Vec<&str> = reports.full.records().iter().map(|r| r.tag).collect();
    assert_eq!(tags, vec!["NoVector", "Vector128", "Vector256", "Vector512"]);
    assert!(reports.full.records()[2].is_placeholder());
    assert!(reports.full.records()[3].is_placeholder());
}

#[test]
fn test_builder_errors_abort_the_run() {
    let driver = Driver::new(small_config(vec![16], 1, 0), ExecutionMode::Baseline).unwrap();
    let result = driver.run(|_| -> Result<Counting> { Err(BenchError::EmptyWorkload) });
    assert!(matches!(result, Err(BenchError::EmptyWorkload)));
}

#[test]
fn test_config_errors_are_fatal() {
    assert!(matches!(
        Driver::new(small_config(vec![16], 0, 1), ExecutionMode::Avx),
        Err(BenchError::Config(_))
    ));
    assert!(matches!("turbo".parse::<ExecutionMode>(), Err(BenchError::UnknownMode(_))));
}

#[test]
fn test_report_shape_is_identical_across_modes() {
    let run = |mode: ExecutionMode| {
        let driver = Driver::new(small_config(vec![16, 20, 64], 2, 1), mode).unwrap();
        driver
            .run(|size| MatmulWorkload::<f32>::generate(size, Fill::Constant(2), Fill::Constant(3)))
            .unwrap()
    };
    let avx = run(ExecutionMode::Avx);
    let avx512 = run(ExecutionMode::Avx512);

    for (a, b) in [(&avx.full, &avx512.full), (&avx.preflight, &avx512.preflight)] {
        assert_eq!(a.len(), b.len());
        let (ta, tb) = (render(a), render(b));
        let rows_a: Vec<&str> = ta.lines().collect();
        let rows_b: Vec<&str> = tb.lines().collect();
        assert_eq!(rows_a.len(), rows_b.len());
        for (ra, rb) in rows_a.iter().zip(&rows_b) {
            assert_eq!(ra.split(',').count(), rb.split(',').count());
            assert_eq!(ra.split(',').next(), rb.split(',').next());
        }
    }
    assert_eq!(avx.full.len(), 2 * 4);
    assert!(avx.full.records()[3].is_placeholder());
    assert!(avx512.full.records()[2].is_placeholder());
}

// ============================================================
// End to end
// ============================================================

#[test]
fn test_dot_1024_end_to_end() {
    let mut config = small_config(vec![1024], 5, 2);
    config.inner_repetitions = 2;
    let driver = Driver::new(config, ExecutionMode::Baseline).unwrap();

    let reports = driver
        .run(|size| DotWorkload::<f32>::generate(size, Fill::Ramp, Fill::Ramp))
        .unwrap();

    let measured: Vec<_> = reports.full.records().iter().filter(|r| !r.is_placeholder()).collect();
    let tags: Vec<&str> = measured.iter().map(|r| r.tag).collect();
    assert_eq!(tags, vec!["NoVector", "Vector128"]);

    for record in measured {
        let summary = record.summary.unwrap();
        assert_eq!(record.size, 1024);
        assert_eq!(summary.count, 5);
        assert!(summary.mean > 0.0, "{}: mean must be positive", record.tag);
        assert!(summary.stddev >= 0.0);
    }

    let pre = reports.preflight.records()[0].summary.unwrap();
    assert_eq!(pre.count, 1);
    assert_eq!(pre.stddev, 0.0);
}

#[test]
fn test_reports_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config(vec![32], 2, 1);
    config.schema = Schema::Legacy;
    let driver = Driver::new(config, ExecutionMode::Avx512).unwrap();

    let reports = driver
        .run(|size| DotWorkload::<i32>::generate(size, Fill::Ramp, Fill::Constant(1)))
        .unwrap();

    let path = dir.path().join("results.csv");
    reports.full.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "name,size,mean,stddev");
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], "Vector256,,,");
    assert!(lines[4].starts_with("Vector512,32,"));
}
