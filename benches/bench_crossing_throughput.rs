use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration,
};
use rand::Rng;

use bat_crossing::crossing::crossroad::SimulationConfig;
use bat_crossing::engine::simulation::run_simulation;

fn random_input(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ['n', 'e', 's', 'w'][rng.random_range(0..4)])
        .collect()
}

fn bench_crossing_throughput(c: &mut Criterion) {
    // Zero crossing time so the benchmark measures the admission protocol,
    // not the simulated travel delay.
    let config = SimulationConfig {
        cross_time: Duration::ZERO,
        detector_period: Duration::from_millis(5),
    };

    let batch_sizes = [4, 16, 64];

    let mut group = c.benchmark_group("crossing_throughput");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &batch_size in &batch_sizes {
        let input = random_input(batch_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &input,
            |b, input| {
                b.iter(|| {
                    let report = run_simulation(input, config).expect("benchmark run failed");
                    criterion::black_box(report);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_crossing_throughput);
criterion_main!(benches);
