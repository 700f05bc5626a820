use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recency_cache::{BoundedRecencyCache, SharedRecencyCache};

const CAPACITY: usize = 50000;

fn cache_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1337);
    let keys: Vec<u64> = (0..CAPACITY * 2).map(|_| rng.r#gen()).collect();

    let mut cache = BoundedRecencyCache::new(CAPACITY).expect("capacity");
    for key in &keys[..CAPACITY] {
        cache.put(*key, *key);
    }

    c.bench_function("get, 100% cache hit", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(cache.get(&keys[i % CAPACITY]));
            i += 1;
        });
    });

    c.bench_function("get, 0% cache hit", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(cache.get(&keys[CAPACITY + i % CAPACITY]));
            i += 1;
        });
    });

    // every insert of a fresh key evicts once the cache is full
    c.bench_function("put, evicting", |b| {
        let mut i = 0;
        b.iter(|| {
            cache.put(black_box(keys[i % keys.len()]), i as u64);
            i += 1;
        });
    });

    c.bench_function("put, overwrite", |b| {
        let key = *cache.peek_mru().expect("non-empty").0;
        let mut i = 0_u64;
        b.iter(|| {
            cache.put(black_box(key), i);
            i += 1;
        });
    });

    let shared = SharedRecencyCache::new(CAPACITY).expect("capacity");
    for key in &keys[..CAPACITY] {
        shared.put(*key, *key);
    }
    c.bench_function("shared get, 100% cache hit", |b| {
        let mut i = 0;
        b.iter(|| {
            black_box(shared.get(&keys[i % CAPACITY]));
            i += 1;
        });
    });
}

criterion_group!(cache, cache_benchmark);
criterion_main!(cache);
