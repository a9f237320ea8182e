use std::collections::BTreeMap;

use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BatchSize,
    BenchmarkId,
    Criterion,
    Throughput,
};
use crossbeam_skiplist::SkipMap;
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};
use skipindex::{
    Config,
    LevelStrategy,
    SkipList,
    RECOMMENDED_EPS,
};

static SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_keys(n: usize) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(42);
    (0..n).map(|_| rng.gen_range(0.0..1_000_000.0)).collect()
}

fn filled(keys: &[f64], strategy: LevelStrategy) -> SkipList<f64> {
    let config = Config::new(RECOMMENDED_EPS).with_strategy(strategy);
    let mut list = SkipList::with_config(config).unwrap();
    list.extend(keys.iter().copied());
    list
}

// BTreeMap wants an Ord key, so the baselines index by the raw bits. only
// sound for the non-negative keys generated above.
fn bits(key: f64) -> u64 {
    key.to_bits()
}

pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in SIZES.iter() {
        let keys = random_keys(*size);
        group.throughput(Throughput::Elements(*size as u64));

        for (name, strategy) in [
            ("skiplist/geometric", LevelStrategy::default()),
            ("skiplist/counter", LevelStrategy::Counter),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &keys, |b, keys| {
                b.iter_batched(
                    || SkipList::with_config(Config::new(RECOMMENDED_EPS).with_strategy(strategy)).unwrap(),
                    |mut list| {
                        for key in keys {
                            list.insert(*key);
                        }
                        list
                    },
                    BatchSize::LargeInput,
                )
            });
        }

        group.bench_with_input(BenchmarkId::new("btreemap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for key in keys {
                    map.insert(bits(*key), *key);
                }
                map
            })
        });

        group.bench_with_input(BenchmarkId::new("crossbeam", size), &keys, |b, keys| {
            b.iter(|| {
                let map = SkipMap::new();
                for key in keys {
                    map.insert(bits(*key), *key);
                }
                map
            })
        });
    }
    group.finish();
}

pub fn find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    for size in SIZES.iter() {
        let keys = random_keys(*size);
        let list = filled(&keys, LevelStrategy::default());
        let map: BTreeMap<u64, f64> = keys.iter().map(|k| (bits(*k), *k)).collect();
        let cmap: SkipMap<u64, f64> = keys.iter().map(|k| (bits(*k), *k)).collect();
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("skiplist", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(list.find(*key));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("btreemap", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(map.get(&bits(*key)));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("crossbeam", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(cmap.get(&bits(*key)).map(|e| *e.value()));
                }
            })
        });
    }
    group.finish();
}

pub fn find_bigger_or_equal(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_bigger_or_equal");
    for size in SIZES.iter() {
        let keys = random_keys(*size);
        let list = filled(&keys, LevelStrategy::default());
        let probes = random_keys(*size / 2);
        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_with_input(BenchmarkId::new("skiplist", size), &probes, |b, probes| {
            b.iter(|| {
                for probe in probes {
                    black_box(list.find_bigger_or_equal(*probe + 0.5));
                }
            })
        });
    }
    group.finish();
}

pub fn delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    for size in SIZES.iter() {
        let keys = random_keys(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("skiplist", size), &keys, |b, keys| {
            b.iter_batched(
                || filled(keys, LevelStrategy::default()),
                |mut list| {
                    for key in keys {
                        list.delete(*key);
                    }
                    list
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

pub fn iterate(c: &mut Criterion) {
    let keys = random_keys(100_000);
    let list = filled(&keys, LevelStrategy::default());
    c.bench_function("iter/100000", |b| b.iter(|| list.iter().fold(0.0, |acc, k| acc + k)));
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets =
    insert,
    find,
    find_bigger_or_equal,
    delete,
    iterate,
);
criterion_main!(benches);
