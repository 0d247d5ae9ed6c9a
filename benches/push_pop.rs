//! Criterion micro-benchmarks for the capacity policy and the merge sort.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use dynamic_array::DynamicArray;

/// Pushes and pops across a doubling boundary, where a naive policy would thrash.
fn bench_boundary_push_pop(c: &mut Criterion) {
    c.bench_function("push_pop_at_boundary", |b| {
        let mut array: DynamicArray<u64> = (0..1024).collect();
        b.iter(|| {
            for i in 0..64 {
                array.push(black_box(i)).unwrap();
                black_box(array.pop().unwrap());
            }
        });
    });
}

fn bench_fill_and_drain(c: &mut Criterion) {
    c.bench_function("fill_and_drain_4096", |b| {
        b.iter(|| {
            let mut array: DynamicArray<u64> = DynamicArray::new();
            for i in 0..4096 {
                array.push(i).unwrap();
            }
            while let Ok(value) = array.pop() {
                black_box(value);
            }
        });
    });
}

fn bench_remove_front(c: &mut Criterion) {
    c.bench_function("remove_front_1024", |b| {
        b.iter(|| {
            let mut array: DynamicArray<u64> = (0..1024).collect();
            while !array.is_empty() {
                black_box(array.remove(0).unwrap());
            }
        });
    });
}

fn bench_sort(c: &mut Criterion) {
    let values: Vec<u64> = (0..4096u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40).collect();
    c.bench_function("merge_sort_4096", |b| {
        b.iter(|| {
            let mut array: DynamicArray<u64> = DynamicArray::from_slice(&values);
            array.sort_by_lower(|a, b| a < b).unwrap();
            black_box(array);
        });
    });
}

criterion_group!(
    benches,
    bench_boundary_push_pop,
    bench_fill_and_drain,
    bench_remove_front,
    bench_sort
);
criterion_main!(benches);
