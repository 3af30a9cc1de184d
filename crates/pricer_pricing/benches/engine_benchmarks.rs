//! Criterion benchmarks for the Monte Carlo engine.
//!
//! Benchmarks cover:
//! - RNG stream generation
//! - Path simulation (1K, 10K, 100K paths) under both evolution schemes
//! - Barrier observation and the full barrier pricing pipeline
//! - Scenario sweep over a small grid

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
use pricer_pricing::mc::{
    simulate, sweep_barrier, BarrierScenario, EvolutionScheme, MonteCarloPricer, ScenarioGrid,
    SimulationGrid,
};
use pricer_pricing::path_dependent::{observe, BarrierSpec, Observation};
use pricer_pricing::rng::PricerRng;

fn grid(paths: usize, steps: usize, scheme: EvolutionScheme) -> SimulationGrid {
    SimulationGrid::builder()
        .initial_price(55.0)
        .drift(0.06)
        .volatility(0.2)
        .horizon(1.0)
        .step_count(steps)
        .path_count(paths)
        .seed(1234)
        .scheme(scheme)
        .build()
        .unwrap()
}

fn barrier() -> BarrierSpec {
    BarrierSpec::new(80.0, BarrierDirection::Up, BarrierMode::KnockOut, Observation::Continuous).unwrap()
}

/// Benchmark batch normal generation.
fn bench_rng(c: &mut Criterion) {
    let mut group = c.benchmark_group("rng");
    for n_samples in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("normal_batch", n_samples), &n_samples, |b, &n| {
            let mut rng = PricerRng::for_stream(42, 0);
            let mut buffer = vec![0.0; n];
            b.iter(|| {
                rng.fill_normal(&mut buffer);
                black_box(buffer.iter().sum::<f64>())
            });
        });
    }
    group.finish();
}

/// Benchmark path simulation with varying path counts.
fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    group.sample_size(20);
    for n_paths in [1_000, 10_000, 100_000] {
        for scheme in [EvolutionScheme::LogExact, EvolutionScheme::Stepwise] {
            let g = grid(n_paths, 252, scheme);
            group.bench_with_input(BenchmarkId::new(scheme.as_str(), n_paths), &g, |b, g| {
                b.iter(|| black_box(simulate(g).unwrap()))
            });
        }
    }
    group.finish();
}

/// Benchmark observation alone and the full pipeline.
fn bench_barrier_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("barrier");
    group.sample_size(20);

    let paths = simulate(&grid(10_000, 252, EvolutionScheme::LogExact)).unwrap();
    let spec = barrier();
    group.bench_function("observe_continuous_10k", |b| {
        b.iter(|| black_box(observe(&paths, &spec)))
    });

    for n_paths in [10_000, 100_000] {
        let pricer = MonteCarloPricer::new(grid(n_paths, 252, EvolutionScheme::LogExact));
        group.bench_with_input(BenchmarkId::new("up_out_call", n_paths), &pricer, |b, pricer| {
            b.iter(|| black_box(pricer.price_barrier(OptionType::Call, 60.0, &spec, 0.06).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark a 5 x 3 scenario sweep.
fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);
    let scenario_grid = ScenarioGrid::new(vec![0.8, 0.9, 1.0, 1.1, 1.2], vec![0.25, 0.5, 1.0]).unwrap();
    let scenario = BarrierScenario {
        base_spot: 55.0,
        rate: 0.06,
        dividend_yield: 0.0,
        volatility: 0.2,
        strike: 60.0,
        option_type: OptionType::Call,
        barrier: barrier(),
        steps_per_year: 252,
        path_count: 10_000,
        seed: 1234,
        scheme: EvolutionScheme::LogExact,
    };
    group.bench_function("barrier_5x3_10k", |b| {
        b.iter(|| black_box(sweep_barrier(&scenario_grid, &scenario)))
    });
    group.finish();
}

criterion_group!(benches, bench_rng, bench_simulation, bench_barrier_pricing, bench_sweep);
criterion_main!(benches);
