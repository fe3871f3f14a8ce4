use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use poise_tree::{AvlTreeMap, RbTreeMap};
use std::collections::BTreeMap;

const N: usize = 10_000;

// ─── Key sequences ──────────────────────────────────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_orders() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

// ─── CRUD ───────────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let mut group = c.benchmark_group(format!("map_insert_{order}"));

        group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
            b.iter(|| keys.iter().map(|&k| (k, k)).collect::<AvlTreeMap<_, _>>());
        });
        group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
            b.iter(|| keys.iter().map(|&k| (k, k)).collect::<RbTreeMap<_, _>>());
        });
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>());
        });

        group.finish();
    }
}

fn bench_get(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let rb: RbTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let mut group = c.benchmark_group(format!("map_get_{order}"));

        group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| avl.get(k)).sum::<i64>());
        });
        group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| rb.get(k)).sum::<i64>());
        });
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| bt.get(k)).sum::<i64>());
        });

        group.finish();
    }
}

fn bench_remove(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let rb: RbTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let mut group = c.benchmark_group(format!("map_remove_{order}"));

        group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
            b.iter_batched_ref(
                || avl.clone(),
                |map| keys.iter().for_each(|k| {
                    map.remove(k);
                }),
                criterion::BatchSize::LargeInput,
            );
        });
        group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
            b.iter_batched_ref(
                || rb.clone(),
                |map| keys.iter().for_each(|k| {
                    map.remove(k);
                }),
                criterion::BatchSize::LargeInput,
            );
        });
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched_ref(
                || bt.clone(),
                |map| keys.iter().for_each(|k| {
                    map.remove(k);
                }),
                criterion::BatchSize::LargeInput,
            );
        });

        group.finish();
    }
}

// ─── Order statistics ───────────────────────────────────────────────────────

fn bench_select(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let mut group = c.benchmark_group("map_select");

    // BTreeMap has no positional index, so it pays a linear walk per lookup.
    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| (1..=avl.len()).step_by(97).filter_map(|i| avl.select(i).ok()).sum::<i64>());
    });
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| (0..bt.len()).step_by(97).filter_map(|i| bt.keys().nth(i)).sum::<i64>());
    });

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    c.bench_function("map_rank/AvlTreeMap", |b| {
        b.iter(|| keys.iter().map(|k| avl.rank(k)).sum::<usize>());
    });
}

fn bench_merge(c: &mut Criterion) {
    let evens: AvlTreeMap<i64, i64> = (0..N as i64).map(|k| (2 * k, k)).collect();
    let odds: AvlTreeMap<i64, i64> = (0..N as i64).map(|k| (2 * k + 1, k)).collect();
    let bt_evens: BTreeMap<i64, i64> = evens.iter().map(|(&k, &v)| (k, v)).collect();
    let bt_odds: BTreeMap<i64, i64> = odds.iter().map(|(&k, &v)| (k, v)).collect();
    let mut group = c.benchmark_group("map_merge");

    group.bench_function(BenchmarkId::new("AvlTreeMap", 2 * N), |b| {
        b.iter_batched(
            || (evens.clone(), odds.clone()),
            |(mut left, mut right)| {
                left.merge(&mut right);
                black_box(left)
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.bench_function(BenchmarkId::new("BTreeMap", 2 * N), |b| {
        b.iter_batched(
            || (bt_evens.clone(), bt_odds.clone()),
            |(mut left, mut right)| {
                left.append(&mut right);
                black_box(left)
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(crud_benches, bench_insert, bench_get, bench_remove);

criterion_group!(order_statistic_benches, bench_select, bench_rank, bench_merge);

criterion_main!(crud_benches, order_statistic_benches);
