//! HNSW Index Performance Benchmarks
//!
//! Run with: `cargo bench --bench hnsw_benchmark`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hnswlite::{DistanceMetric, HnswIndex, HnswParams};

const DIM: usize = 128;

/// Generates a random-ish vector for benchmarking.
#[allow(clippy::cast_precision_loss)]
fn generate_vector(dim: usize, seed: u64) -> Vec<f32> {
    (0..dim)
        .map(|i| ((seed as f32 * 0.1 + i as f32 * 0.01).sin() + 1.0) / 2.0)
        .collect()
}

fn params() -> HnswParams {
    HnswParams::new(DIM, DistanceMetric::Cosine).with_seed(42)
}

fn populated(count: u64) -> HnswIndex {
    let mut index = HnswIndex::new(params()).expect("valid params");
    for i in 0..count {
        index
            .insert(i.to_string(), &generate_vector(DIM, i))
            .expect("insert");
    }
    index
}

/// Benchmark HNSW index insertion performance.
fn bench_hnsw_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_insert");
    group.sample_size(10);

    for count in [1_000u64, 5_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(
            BenchmarkId::new("vectors", format!("{count}x{DIM}d")),
            &count,
            |b, &count| {
                b.iter(|| black_box(populated(count).len()));
            },
        );
    }

    group.finish();
}

/// Benchmark HNSW index search latency.
fn bench_hnsw_search_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_search_latency");

    let index = populated(10_000);
    let query = generate_vector(DIM, 99_999);

    for k in [10usize, 50, 100] {
        group.bench_with_input(BenchmarkId::new("top_k", k), &k, |b, &k| {
            b.iter(|| black_box(index.search(&query, k)));
        });
    }

    for ef in [16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::new("ef", ef), &ef, |b, &ef| {
            b.iter(|| black_box(index.search_with_ef(&query, 10, ef)));
        });
    }

    group.bench_function("brute_force", |b| {
        b.iter(|| black_box(index.brute_force_search(&query, 10)));
    });

    group.finish();
}

/// Benchmark deletion with neighborhood repair.
fn bench_hnsw_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_delete");
    group.sample_size(10);

    let base = populated(5_000);
    group.bench_function("delete_1000_of_5000", |b| {
        b.iter_batched(
            || base.clone(),
            |mut index| {
                for i in 0..1_000u64 {
                    index.delete(&(i * 5).to_string());
                }
                black_box(index.len())
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

/// Benchmark binary serialization both ways.
fn bench_hnsw_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_persistence");

    let index = populated(10_000);
    let bytes = index.to_bytes();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("to_bytes", |b| b.iter(|| black_box(index.to_bytes())));
    group.bench_function("from_bytes", |b| {
        b.iter(|| black_box(HnswIndex::from_bytes(&bytes)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_hnsw_insert,
    bench_hnsw_search_latency,
    bench_hnsw_delete,
    bench_hnsw_persistence
);
criterion_main!(benches);
