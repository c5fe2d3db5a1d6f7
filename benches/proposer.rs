use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gp_suggest::prelude::*;


/// Build `n` uniformly sampled observations of the negated sphere function
/// over `dims` dimensions.
fn build_history(n: usize, dims: usize) -> (Observations, Bounds) {
    let bounds = Bounds::new(vec![(-5.0, 5.0); dims]).unwrap();
    let mut rng = fastrand::Rng::with_seed(42);
    let mut obs = Observations::empty();
    for _ in 0..n {
        let x = bounds.sample(&mut rng);
        let y = -test_functions::sphere(&x);
        obs.push(x, y).unwrap();
    }
    (obs, bounds)
}

fn bench_gp_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("gp_fit");

    for history_size in [5, 20, 50] {
        let (obs, _) = build_history(history_size, 2);
        group.bench_with_input(
            BenchmarkId::new("history", history_size),
            &obs,
            |b, obs| {
                b.iter(|| {
                    let mut gp = GaussianProcess::builder().noise(0.2).build().unwrap();
                    gp.fit(obs.inputs(), obs.outputs()).unwrap();
                    gp
                });
            },
        );
    }
    group.finish();
}

fn bench_expected_improvement(c: &mut Criterion) {
    let mut group = c.benchmark_group("expected_improvement");
    let (obs, bounds) = build_history(20, 2);
    let mut gp = GaussianProcess::builder().noise(0.2).build().unwrap();
    gp.fit(obs.inputs(), obs.outputs()).unwrap();

    for n_candidates in [1, 100, 1000] {
        let mut rng = fastrand::Rng::with_seed(7);
        let candidates: Vec<Vec<f64>> = (0..n_candidates).map(|_| bounds.sample(&mut rng)).collect();
        group.bench_with_input(
            BenchmarkId::new("candidates", n_candidates),
            &candidates,
            |b, candidates| {
                b.iter(|| expected_improvement(candidates, &obs, &gp, 0.01).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_propose(c: &mut Criterion) {
    let mut group = c.benchmark_group("propose");
    group.sample_size(10);
    let proposer = Proposer::with_seed(42);

    for history_size in [5, 20] {
        let (obs, bounds) = build_history(history_size, 2);
        group.bench_with_input(
            BenchmarkId::new("history", history_size),
            &obs,
            |b, obs| {
                b.iter(|| {
                    proposer
                        .propose(&ExpectedImprovement::new(), obs, &bounds)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_gp_fit,
    bench_expected_improvement,
    bench_propose
);
criterion_main!(benches);
