use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lww_dict::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_replica(rng: &mut StdRng, ops: usize, keys: u32) -> LWWDict<u32, u64> {
    let mut dict = LWWDict::new();
    for _ in 0..ops {
        let key = rng.gen_range(0..keys);
        let ts = Timestamp::from_micros(rng.gen_range(0..1_000_000));
        if rng.gen_bool(0.8) {
            dict.add_with_timestamp(key, rng.gen(), ts);
        } else {
            dict.remove_with_timestamp(key, ts);
        }
    }
    dict
}

fn bench_add(c: &mut Criterion) {
    c.bench_function("LWWDict::add x1000", |b| {
        b.iter(|| {
            let mut dict = LWWDict::new();
            for i in 0..1000u32 {
                dict.add_with_timestamp(i, i, Timestamp::from_micros(u64::from(i)));
            }
            black_box(dict.len())
        })
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let dict = random_replica(&mut rng, 10_000, 1_000);

    c.bench_function("LWWDict::lookup x1000", |b| {
        b.iter(|| {
            let mut hits = 0;
            for key in 0..1000u32 {
                if dict.lookup(&key).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let replicas: Vec<LWWDict<u32, u64>> =
        (0..10).map(|_| random_replica(&mut rng, 1_000, 500)).collect();

    c.bench_function("LWWDict::merge 10 replicas", |b| {
        b.iter(|| {
            let mut merged = replicas[0].clone();
            for other in &replicas[1..] {
                merged.merge(other);
            }
            black_box(merged.len())
        })
    });
}

fn bench_delta(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(9);
    let base = random_replica(&mut rng, 5_000, 2_000);
    let mut ahead = base.clone();
    for i in 0..50u32 {
        ahead.add_with_timestamp(i, 0, Timestamp::from_secs(10));
    }

    c.bench_function("LWWDict::delta+apply (50 changes)", |b| {
        b.iter(|| {
            let mut behind = base.clone();
            let delta = ahead.delta(&behind);
            behind.apply_delta(&delta);
            black_box(delta.len())
        })
    });
}

criterion_group!(benches, bench_add, bench_lookup, bench_merge, bench_delta);
criterion_main!(benches);
