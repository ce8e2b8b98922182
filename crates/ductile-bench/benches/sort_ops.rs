//! Criterion micro-benchmarks for the merge sort.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ductile_bench::{filled_seq, random_values, SIZES};
use ductile_seq::Seq;
use ductile_test_utils::cmp_i32;

/// Benchmark: byte-level sort of N random elements.
fn bench_sort_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_bytes");
    for n in SIZES {
        let values = random_values(n, 20);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter_batched(
                || filled_seq(values).unwrap(),
                |mut seq| {
                    seq.sort(cmp_i32).unwrap();
                    black_box(seq.front().map(<[u8]>::len));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Benchmark: typed sort of N random elements.
fn bench_sort_typed(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_typed");
    for n in SIZES {
        let values = random_values(n, 21);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter_batched(
                || {
                    let mut seq = Seq::<i32>::new().unwrap();
                    seq.push_back_slice(values).unwrap();
                    seq
                },
                |mut seq| {
                    seq.sort().unwrap();
                    black_box(seq.front());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Benchmark: sorting input that is already in order.
fn bench_sort_presorted(c: &mut Criterion) {
    let mut values = random_values(16_384, 22);
    values.sort_unstable();
    c.bench_function("sort_presorted_16384", |b| {
        b.iter_batched(
            || filled_seq(&values).unwrap(),
            |mut seq| {
                seq.sort(cmp_i32).unwrap();
                black_box(seq.len());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_sort_bytes, bench_sort_typed, bench_sort_presorted);
criterion_main!(benches);
