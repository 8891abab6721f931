use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rxlevel_processor::config::AggregationConfig;
use rxlevel_processor::{Aggregator, DayBuckets, Sample, TimeOfDay};

/// One sample every `step` seconds over a whole day
fn day_of_samples(step: u32) -> Vec<Sample> {
    (0..86_400)
        .step_by(step as usize)
        .map(|seconds| {
            let value = if seconds % 97 == 0 {
                None
            } else {
                Some(-40.0 - f64::from(seconds % 30))
            };
            Sample::new(TimeOfDay::from_seconds(seconds).unwrap(), value)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let buckets = DayBuckets::generate(10).unwrap();
    let aggregator = Aggregator::new(AggregationConfig::default());

    let mut group = c.benchmark_group("aggregate_day");
    for step in [1u32, 2, 10] {
        let samples = day_of_samples(step);
        group.bench_with_input(BenchmarkId::from_parameter(step), &samples, |b, samples| {
            b.iter(|| aggregator.aggregate(black_box(samples), &buckets))
        });
    }
    group.finish();
}

fn bench_generate_buckets(c: &mut Criterion) {
    c.bench_function("generate_day_buckets", |b| {
        b.iter(|| DayBuckets::generate(black_box(10)).unwrap())
    });
}

criterion_group!(benches, bench_aggregate, bench_generate_buckets);
criterion_main!(benches);
