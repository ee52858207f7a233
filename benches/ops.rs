use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use perma::{Map, Vector};
use std::collections::HashMap;

/// Benchmark persistent insertion against cloning and mutating a HashMap.
fn bench_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("Map", size), size, |b, &size| {
            let map: Map<u64, u64> = (0..size).map(|key| (key, key)).collect();

            b.iter(|| black_box(map.insert(size, size)));
        });

        group.bench_with_input(BenchmarkId::new("HashMap", size), size, |b, &size| {
            let map: HashMap<u64, u64> = (0..size).map(|key| (key, key)).collect();

            b.iter(|| {
                let mut map = map.clone();
                map.insert(size, size);
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_map_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_get");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("Map", size), size, |b, &size| {
            let map: Map<u64, u64> = (0..size).map(|key| (key, key)).collect();

            b.iter(|| black_box(map.get(&(size / 2))));
        });

        group.bench_with_input(BenchmarkId::new("HashMap", size), size, |b, &size| {
            let map: HashMap<u64, u64> = (0..size).map(|key| (key, key)).collect();

            b.iter(|| black_box(map.get(&(size / 2))));
        });
    }

    group.finish();
}

/// Benchmark persistent append against cloning and pushing onto a Vec.
fn bench_vector_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_push");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("Vector", size), size, |b, &size| {
            let vector: Vector<u64> = (0..size).collect();

            b.iter(|| black_box(vector.push(size)));
        });

        group.bench_with_input(BenchmarkId::new("Vec", size), size, |b, &size| {
            let vec: Vec<u64> = (0..size).collect();

            b.iter(|| {
                let mut vec = vec.clone();
                vec.push(size);
                black_box(vec)
            });
        });
    }

    group.finish();
}

fn bench_vector_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_get");

    for size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("Vector", size), size, |b, &size| {
            let vector: Vector<u64> = (0..size).collect();

            b.iter(|| black_box(vector.get(size as usize / 2)));
        });

        group.bench_with_input(BenchmarkId::new("Vec", size), size, |b, &size| {
            let vec: Vec<u64> = (0..size).collect();

            b.iter(|| black_box(vec.get(size as usize / 2)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_map_insert,
    bench_map_get,
    bench_vector_push,
    bench_vector_get
);
criterion_main!(benches);
