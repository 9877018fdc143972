use countkit::counter::HitCounter;
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn skewed_workload(adds: usize, keyspace: u32) -> Vec<String> {
    // Rough hot-set skew: half the traffic hits an eighth of the keys.
    let mut rng = StdRng::seed_from_u64(42);
    (0..adds)
        .map(|_| {
            let key = if rng.gen_bool(0.5) {
                rng.gen_range(0..keyspace / 8)
            } else {
                rng.gen_range(0..keyspace)
            };
            format!("domain-{}.com", key)
        })
        .collect()
}

fn bench_add_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_add");
    let workload = skewed_workload(8_192, 1_024);
    group.throughput(Throughput::Elements(workload.len() as u64));
    group.bench_function("skewed_keys", |b| {
        b.iter_batched(
            HitCounter::new,
            |mut counter| {
                for key in &workload {
                    counter.add(std::hint::black_box(key.clone()));
                }
                counter
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_top");
    let workload = skewed_workload(16_384, 2_048);
    let mut counter = HitCounter::new();
    for key in &workload {
        counter.add(key.clone());
    }

    for k in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_function(format!("top_{}", k), |b| {
            b.iter(|| std::hint::black_box(counter.top_counts(std::hint::black_box(k))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_throughput, bench_top_k);
criterion_main!(benches);
