use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jpeg_transform::TransformBasis;

fn block(size: usize) -> Vec<f32> {
    (0..size * size).map(|i| ((i * 37) % 256) as f32).collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fdct");

    for size in [4, 8, 16] {
        let basis = TransformBasis::new(size).unwrap();
        let pixels = block(size);
        let mut coefficients = vec![0f32; size * size];
        let mut scratch = vec![0f64; size * size];

        group.bench_with_input(BenchmarkId::new("separable", size), &size, |b, _| {
            b.iter(|| {
                basis.forward(black_box(&pixels), &mut coefficients, &mut scratch);
                black_box(&coefficients);
            })
        });

        group.bench_with_input(BenchmarkId::new("direct", size), &size, |b, _| {
            b.iter(|| {
                basis.forward_direct(black_box(&pixels), &mut coefficients);
                black_box(&coefficients);
            })
        });

        group.bench_with_input(BenchmarkId::new("inverse", size), &size, |b, _| {
            b.iter(|| {
                basis.inverse(black_box(&pixels), &mut coefficients, &mut scratch);
                black_box(&coefficients);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
