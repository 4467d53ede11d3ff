use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use simd_bench::kernels::{Tier, dot, matmul};
use std::hint::black_box;

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");

    for size in [1024usize, 16384] {
        let a: Vec<f32> = (0..size).map(|i| (i % 100) as f32).collect();
        let b: Vec<f32> = (0..size).map(|i| (i % 100) as f32).collect();

        for tier in Tier::ALL {
            group.bench_with_input(BenchmarkId::new(tier.tag(), size), &size, |bench, _| {
                bench.iter(|| dot(tier, black_box(&a), black_box(&b)))
            });
        }
    }

    group.finish();
}

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    group.sample_size(10);

    for size in [64usize, 256] {
        let a = vec![2.0f32; size * size];
        let b = vec![3.0f32; size * size];
        let mut out = vec![0.0f32; size * size];

        for tier in Tier::ALL {
            group.bench_with_input(BenchmarkId::new(tier.tag(), size), &size, |bench, &size| {
                bench.iter(|| {
                    out.fill(0.0);
                    matmul(tier, black_box(&a), black_box(&b), &mut out, size);
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_dot, bench_matmul);
criterion_main!(benches);
