use gp_suggest::prelude::*;

#[test]
fn test_cold_start_samples_inside_the_box() {
    let bounds = Bounds::new([(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
    for seed in 0..20 {
        let x = Proposer::with_seed(seed)
            .propose(&ExpectedImprovement::new(), &Observations::empty(), &bounds)
            .unwrap();
        assert_eq!(x.len(), 2);
        assert!(bounds.contains(&x), "cold start {x:?} out of bounds");
    }
}

#[test]
fn test_cold_start_in_widest_box() {
    let bounds = Bounds::new([(-f64::MAX, f64::MAX)]).unwrap();
    for seed in 0..5 {
        let x = Proposer::with_seed(seed)
            .propose(&ExpectedImprovement::new(), &Observations::empty(), &bounds)
            .unwrap();
        assert!(x[0].is_finite(), "seed {seed}: sampled {}", x[0]);
        assert!(bounds.contains(&x));
    }
}

#[test]
fn test_cold_start_depends_on_seed() {
    let bounds = Bounds::new([(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]).unwrap();
    let a = Proposer::with_seed(1)
        .propose(&ExpectedImprovement::new(), &Observations::empty(), &bounds)
        .unwrap();
    let b = Proposer::with_seed(2)
        .propose(&ExpectedImprovement::new(), &Observations::empty(), &bounds)
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_cold_start_is_roughly_uniform() {
    let bounds = Bounds::new([(0.0, 1.0)]).unwrap();
    let proposer = Proposer::with_seed(42);
    let n = 2000;
    let mut samples: Vec<f64> = (0..n)
        .map(|_| {
            proposer
                .propose(&ExpectedImprovement::new(), &Observations::empty(), &bounds)
                .unwrap()[0]
        })
        .collect();
    samples.sort_by(f64::total_cmp);

    let q1 = samples[n / 4];
    let q2 = samples[n / 2];
    let q3 = samples[3 * n / 4];
    assert!((q1 - 0.25).abs() < 0.05, "Q1 {q1} should be close to 0.25");
    assert!((q2 - 0.5).abs() < 0.05, "median {q2} should be close to 0.5");
    assert!((q3 - 0.75).abs() < 0.05, "Q3 {q3} should be close to 0.75");
}

#[test]
fn test_cold_start_does_not_score() {
    let bounds = Bounds::new([(0.0, 1.0)]).unwrap();
    // An acquisition that always fails is never consulted without data.
    let failing = |_: &[Vec<f64>], _: &Observations, _: &dyn Surrogate| -> Result<Vec<f64>> {
        Err(Error::EmptyObservations)
    };
    let proposal = Proposer::with_seed(3)
        .suggest(&failing, &Observations::empty(), &bounds)
        .unwrap();
    assert_eq!(proposal.acquisition_value, None);
    assert!(bounds.contains(&proposal.location));
}
