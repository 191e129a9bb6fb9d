//! Benchmark slice kernels on every level this CPU supports.
//!
//! Run with: `cargo bench --bench vector_benchmark`

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simdlane::{KernelRegistry, Mask, SimdVec};

fn generate_vector(dim: usize, seed: f32) -> Vec<f32> {
    (0..dim).map(|i| (seed + i as f32 * 0.1).sin()).collect()
}

fn generate_ints(dim: usize, seed: i32) -> Vec<i32> {
    (0..dim).map(|i| (i as i32).wrapping_mul(seed) ^ 0x5A5A).collect()
}

/// Warmup function to stabilize CPU frequency and caches
fn warmup<F: Fn()>(f: F) {
    for _ in 0..3 {
        f();
    }
}

fn registries() -> Vec<KernelRegistry> {
    KernelRegistry::supported_levels()
        .into_iter()
        .filter_map(|level| KernelRegistry::for_level(level).ok())
        .collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_i32");

    for dim in &[64, 1024, 16384] {
        let a = generate_ints(*dim, 31);
        let b = generate_ints(*dim, 17);
        let mut out = vec![0i32; *dim];

        for reg in registries() {
            let id = BenchmarkId::new(reg.level().to_string(), dim);
            group.bench_with_input(id, dim, |bencher, _| {
                bencher.iter(|| reg.add_slices(black_box(&a), black_box(&b), &mut out));
            });
        }
    }

    group.finish();
}

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_f32");

    for dim in &[128, 768, 3072] {
        let a = generate_vector(*dim, 0.0);
        let b = generate_vector(*dim, 1.0);

        for reg in registries() {
            let id = BenchmarkId::new(reg.level().to_string(), dim);
            group.bench_with_input(id, dim, |bencher, _| {
                warmup(|| {
                    let _ = reg.dot(&a, &b);
                });
                bencher.iter(|| reg.dot(black_box(&a), black_box(&b)));
            });
        }
    }

    group.finish();
}

fn bench_mul_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul_add_f32");

    for dim in &[128, 3072] {
        let a = generate_vector(*dim, 0.0);
        let b = generate_vector(*dim, 1.0);
        let addend = generate_vector(*dim, 2.0);
        let mut out = vec![0.0f32; *dim];

        for reg in registries() {
            let id = BenchmarkId::new(reg.level().to_string(), dim);
            group.bench_with_input(id, dim, |bencher, _| {
                bencher.iter(|| {
                    reg.mul_add_slices(black_box(&a), black_box(&b), black_box(&addend), &mut out)
                });
            });
        }
    }

    group.finish();
}

/// Compare-and-merge through the façade on the bound level.
fn bench_clamp_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("clamp_merge_f32");
    let n = SimdVec::<f32>::lanes();

    for dim in &[1024, 16384] {
        let data = generate_vector(*dim, 0.5);
        let mut out = vec![0.0f32; *dim];
        let limit = SimdVec::broadcast(0.25f32);

        group.bench_with_input(BenchmarkId::new("facade", dim), dim, |bencher, _| {
            bencher.iter(|| {
                for (src, dst) in data.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
                    let Ok(v) = SimdVec::load(black_box(src)) else {
                        return;
                    };
                    let mask: Mask<f32> = v.simd_gt(limit);
                    let _ = SimdVec::merge(limit, v, mask).store(dst);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_dot, bench_mul_add, bench_clamp_merge);
criterion_main!(benches);
