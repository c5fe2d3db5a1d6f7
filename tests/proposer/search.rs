use gp_suggest::prelude::*;
use gp_suggest::{LbfgsbConfig, Prediction};

use crate::test_functions::{branin, sphere};

fn one_dim() -> (Observations, Bounds) {
    let obs = Observations::new(vec![vec![0.0], vec![1.0]], vec![0.0, 1.0]).unwrap();
    let bounds = Bounds::new([(0.0, 2.0)]).unwrap();
    (obs, bounds)
}

#[test]
fn test_proposal_stays_in_bounds() {
    let (obs, bounds) = one_dim();
    for seed in 0..5 {
        let proposal = Proposer::with_seed(seed)
            .suggest(&ExpectedImprovement::new(), &obs, &bounds)
            .unwrap();
        assert_eq!(proposal.location.len(), 1);
        assert!(
            bounds.contains(&proposal.location),
            "seed {seed}: {:?} out of bounds",
            proposal.location
        );
        let score = proposal.acquisition_value.unwrap();
        assert!(score >= 0.0, "EI must be non-negative, got {score}");
        assert!(proposal.successful_restarts > 0);
    }
}

#[test]
fn test_same_seed_same_proposal() {
    let (obs, bounds) = one_dim();
    let a = Proposer::with_seed(99)
        .propose(&ExpectedImprovement::new(), &obs, &bounds)
        .unwrap();
    let b = Proposer::with_seed(99)
        .propose(&ExpectedImprovement::new(), &obs, &bounds)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_proposal_beats_observed_points() {
    let (obs, bounds) = one_dim();
    let proposal = Proposer::with_seed(4)
        .suggest(&ExpectedImprovement::new(), &obs, &bounds)
        .unwrap();

    let mut gp = GaussianProcess::builder().noise(0.2).build().unwrap();
    gp.fit(obs.inputs(), obs.outputs()).unwrap();
    let at_observed = expected_improvement(obs.inputs(), &obs, &gp, 0.01).unwrap();
    let best = proposal.acquisition_value.unwrap();
    for v in at_observed {
        assert!(best >= v - 1e-9, "proposal score {best} below {v}");
    }
}

#[test]
fn test_degenerate_dimension_is_respected() {
    let obs = Observations::new(
        vec![vec![0.1, 2.0], vec![0.8, 2.0], vec![0.4, 2.0]],
        vec![0.3, -0.2, 0.9],
    )
    .unwrap();
    let bounds = Bounds::new([(0.0, 1.0), (2.0, 2.0)]).unwrap();
    let x = Proposer::with_seed(8)
        .propose(&ExpectedImprovement::new(), &obs, &bounds)
        .unwrap();
    assert_eq!(x[1], 2.0);
    assert!((0.0..=1.0).contains(&x[0]));
}

#[test]
fn test_custom_acquisition_closure() {
    let ucb = |x: &[Vec<f64>], _: &Observations, gp: &dyn Surrogate| -> Result<Vec<f64>> {
        let Prediction { mean, std } = gp.predict(x)?;
        Ok(mean.iter().zip(&std).map(|(m, s)| m + 2.0 * s).collect())
    };
    let (obs, bounds) = one_dim();
    let proposal = Proposer::with_seed(12).suggest(&ucb, &obs, &bounds).unwrap();
    assert!(bounds.contains(&proposal.location));
    assert!(proposal.acquisition_value.unwrap().is_finite());
}

#[test]
fn test_custom_local_optimizer_config() {
    let (obs, bounds) = one_dim();
    let proposer = Proposer::builder()
        .seed(6)
        .n_restarts(5)
        .optimizer(Lbfgsb::with_config(LbfgsbConfig {
            max_iterations: 10,
            ..LbfgsbConfig::default()
        }))
        .build()
        .unwrap();
    let proposal = proposer
        .suggest(&ExpectedImprovement::new(), &obs, &bounds)
        .unwrap();
    assert!(bounds.contains(&proposal.location));
    assert!(proposal.successful_restarts <= 5);
}

#[test]
fn test_sequential_loop_on_branin() {
    let bounds = Bounds::new([(-5.0, 10.0), (0.0, 15.0)]).unwrap();
    let proposer = Proposer::builder().seed(21).n_restarts(10).build().unwrap();
    let mut obs = Observations::empty();

    for _ in 0..10 {
        let x = proposer
            .propose(&ExpectedImprovement::new(), &obs, &bounds)
            .unwrap();
        assert!(bounds.contains(&x), "{x:?} out of bounds");
        let y = -branin(&x);
        obs.push(x, y).unwrap();
    }
    assert_eq!(obs.len(), 10);
}

#[test]
fn test_sequential_loop_improves_on_sphere() {
    let bounds = Bounds::new([(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
    let proposer = Proposer::with_seed(2024);
    let mut obs = Observations::empty();

    for _ in 0..15 {
        let x = proposer
            .propose(&ExpectedImprovement::new(), &obs, &bounds)
            .unwrap();
        let y = -sphere(&x);
        obs.push(x, y).unwrap();
    }

    let best = obs.outputs().iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(-best < 5.0, "best sphere value {} after 15 steps", -best);
}
