//! Criterion benchmarks for par-anneal.
//!
//! Uses seeded synthetic scheduling instances to measure engine
//! throughput across instance sizes, cooling laws, and worker counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use par_anneal::sa::{CoolingLaw, ParallelConfig, ParallelSaRunner, SaConfig, SaRunner};
use par_anneal::scheduling::{generate_jobs, SchedulingMutation, SchedulingSolution};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scheduling_instance(jobs: usize, processors: usize, seed: u64) -> SchedulingSolution {
    let mut rng = StdRng::seed_from_u64(seed);
    let durations = generate_jobs(jobs, 1, 100, &mut rng);
    SchedulingSolution::new(durations, processors, &mut rng).expect("valid instance")
}

fn bench_engine_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_sizes");
    group.sample_size(10);

    for &(jobs, processors) in &[(100usize, 8usize), (1000, 32), (10000, 64)] {
        let initial = scheduling_instance(jobs, processors, 42);
        let config = SaConfig::bounded(1000)
            .with_cooling(CoolingLaw::Boltzmann { initial: 100.0 })
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{jobs}x{processors}")),
            &config,
            |b, config| {
                b.iter(|| {
                    let result = SaRunner::run(
                        black_box(initial.clone()),
                        &SchedulingMutation,
                        black_box(config),
                    );
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_cooling_laws(c: &mut Criterion) {
    let mut group = c.benchmark_group("cooling_laws");
    group.sample_size(10);

    let initial = scheduling_instance(1000, 32, 42);
    for (name, law) in [
        ("boltzmann", CoolingLaw::Boltzmann { initial: 100.0 }),
        ("cauchy", CoolingLaw::Cauchy { initial: 100.0 }),
        ("log-cauchy", CoolingLaw::LogCauchy { initial: 100.0 }),
    ] {
        let config = SaConfig::bounded(1000).with_cooling(law).with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| {
                let result = SaRunner::run(
                    black_box(initial.clone()),
                    &SchedulingMutation,
                    black_box(config),
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_coordinator_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinator_workers");
    group.sample_size(10);

    let initial = scheduling_instance(500, 32, 42);
    for &workers in &[1usize, 2, 4, 8] {
        let config = ParallelConfig::default()
            .with_num_workers(workers)
            .with_worker_iterations(250)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &config, |b, config| {
            b.iter(|| {
                let result = ParallelSaRunner::run(
                    black_box(initial.clone()),
                    &SchedulingMutation,
                    black_box(config),
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_engine_sizes,
    bench_cooling_laws,
    bench_coordinator_workers
);
criterion_main!(benches);
