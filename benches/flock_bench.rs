//! Tick throughput for the all-pairs and grid neighbor searches

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use torus_flock::sim::{NeighborSearch, Simulation, SpawnConfig, TickParams, World, tick};

fn bench_tick(c: &mut Criterion) {
    let world = World::new(1600.0, 1200.0);

    for search in [NeighborSearch::AllPairs, NeighborSearch::Grid] {
        let mut group = c.benchmark_group(format!("tick_{}", search.as_str()));

        for num_boids in [100, 500, 1000, 2000] {
            group.bench_with_input(BenchmarkId::from_parameter(num_boids), &num_boids, |b, &n| {
                let mut sim = Simulation::new(42, SpawnConfig::for_size_multiplier(n, 2.0), &world);
                let mut params = TickParams::new(world);
                params.options.search = search;

                b.iter(|| black_box(tick(&mut sim, &params)));
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_tick
}

criterion_main!(benches);
