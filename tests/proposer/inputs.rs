use gp_suggest::prelude::*;

#[test]
fn test_generate_parameters_matches_seeded_proposer() {
    let x_obs = vec![vec![0.0], vec![1.0]];
    let y_obs = vec![0.0, 1.0];
    let ranges = [(0.0, 2.0)];

    let mut rng = fastrand::Rng::with_seed(17);
    let from_slices =
        generate_parameters(&ExpectedImprovement::new(), &x_obs, &y_obs, &ranges, &mut rng)
            .unwrap();

    let obs = Observations::new(x_obs, y_obs).unwrap();
    let bounds = Bounds::new(ranges).unwrap();
    let from_proposer = Proposer::with_seed(17)
        .propose(&ExpectedImprovement::new(), &obs, &bounds)
        .unwrap();

    assert_eq!(from_slices, from_proposer);
}

#[test]
fn test_ragged_inputs_are_rejected() {
    let mut rng = fastrand::Rng::with_seed(0);
    let result = generate_parameters(
        &ExpectedImprovement::new(),
        &[vec![0.0, 1.0], vec![0.5]],
        &[1.0, 2.0],
        &[(0.0, 1.0), (0.0, 1.0)],
        &mut rng,
    );
    assert!(matches!(result, Err(Error::DimensionMismatch { index: 1, .. })));
}

#[test]
fn test_output_count_must_match() {
    let mut rng = fastrand::Rng::with_seed(0);
    let result = generate_parameters(
        &ExpectedImprovement::new(),
        &[vec![0.0], vec![0.5]],
        &[1.0],
        &[(0.0, 1.0)],
        &mut rng,
    );
    assert!(matches!(
        result,
        Err(Error::ObservationCountMismatch {
            inputs: 2,
            outputs: 1
        })
    ));
}

#[test]
fn test_bounds_must_match_observations() {
    let mut rng = fastrand::Rng::with_seed(0);
    let result = generate_parameters(
        &ExpectedImprovement::new(),
        &[vec![0.0, 0.0]],
        &[1.0],
        &[(0.0, 1.0)],
        &mut rng,
    );
    assert!(matches!(
        result,
        Err(Error::BoundsDimensionMismatch {
            bounds: 1,
            observations: 2
        })
    ));
}

#[test]
fn test_reversed_bounds_are_rejected() {
    let mut rng = fastrand::Rng::with_seed(0);
    let result = generate_parameters(
        &ExpectedImprovement::new(),
        &[],
        &[],
        &[(0.0, 1.0), (3.0, 2.0)],
        &mut rng,
    );
    assert!(matches!(result, Err(Error::InvalidBounds { dim: 1, .. })));
}

#[test]
fn test_non_finite_output_is_rejected() {
    assert!(matches!(
        Observations::new(vec![vec![0.0], vec![1.0]], vec![0.0, f64::NAN]),
        Err(Error::NonFiniteObservation { index: 1 })
    ));
}
