//! Acquisition functions scoring candidate locations under a fitted surrogate.
//!
//! Higher scores are better. The [`AcquisitionFunction`] trait is
//! implemented by [`ExpectedImprovement`] and by any closure with the
//! matching signature:
//!
//! ```
//! use gp_suggest::{AcquisitionFunction, Observations, Result, Surrogate};
//!
//! // Upper confidence bound, written inline.
//! let ucb = |x: &[Vec<f64>], _obs: &Observations, gp: &dyn Surrogate| -> Result<Vec<f64>> {
//!     let p = gp.predict(x)?;
//!     Ok(p.mean.iter().zip(&p.std).map(|(m, s)| m + 2.0 * s).collect())
//! };
//! fn takes_acquisition(_: &dyn AcquisitionFunction) {}
//! takes_acquisition(&ucb);
//! ```

use statrs::function::erf::erfc;

use crate::error::{Error, Result};
use crate::observation::Observations;
use crate::surrogate::Surrogate;

/// Default exploration bias of [`ExpectedImprovement`].
pub const DEFAULT_XI: f64 = 0.01;

/// Scores candidate locations; higher is better.
pub trait AcquisitionFunction: Send + Sync {
    /// Scores every row of `candidates` (`m x d`) given the observations and
    /// a surrogate already fitted to them.
    ///
    /// # Errors
    ///
    /// Returns an error if the surrogate cannot be queried or the inputs
    /// are unusable.
    fn evaluate(
        &self,
        candidates: &[Vec<f64>],
        observations: &Observations,
        surrogate: &dyn Surrogate,
    ) -> Result<Vec<f64>>;
}

impl<F> AcquisitionFunction for F
where
    F: Fn(&[Vec<f64>], &Observations, &dyn Surrogate) -> Result<Vec<f64>> + Send + Sync,
{
    fn evaluate(
        &self,
        candidates: &[Vec<f64>],
        observations: &Observations,
        surrogate: &dyn Surrogate,
    ) -> Result<Vec<f64>> {
        self(candidates, observations, surrogate)
    }
}

/// Expected Improvement over the best posterior mean at the observed inputs.
///
/// `xi` is an exploration bias: larger values discount the improvement
/// and favour uncertain regions.
///
/// # Examples
///
/// ```
/// use gp_suggest::ExpectedImprovement;
///
/// assert_eq!(ExpectedImprovement::new().xi(), 0.01);
/// assert!(ExpectedImprovement::with_xi(0.1).is_ok());
/// assert!(ExpectedImprovement::with_xi(-0.1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpectedImprovement {
    xi: f64,
}

impl ExpectedImprovement {
    /// Creates the acquisition with the default exploration bias (0.01).
    #[must_use]
    pub fn new() -> Self {
        Self { xi: DEFAULT_XI }
    }

    /// Creates the acquisition with a custom exploration bias.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidExplorationBias` if `xi` is negative or non-finite.
    pub fn with_xi(xi: f64) -> Result<Self> {
        validate_xi(xi)?;
        Ok(Self { xi })
    }

    /// The exploration bias.
    #[must_use]
    pub fn xi(&self) -> f64 {
        self.xi
    }
}

impl Default for ExpectedImprovement {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionFunction for ExpectedImprovement {
    fn evaluate(
        &self,
        candidates: &[Vec<f64>],
        observations: &Observations,
        surrogate: &dyn Surrogate,
    ) -> Result<Vec<f64>> {
        expected_improvement(candidates, observations, surrogate, self.xi)
    }
}

/// Expected Improvement at each row of `candidates`.
///
/// The incumbent is the largest posterior mean at the observed inputs,
/// not the largest raw output, so observation noise smoothed away by the
/// surrogate does not inflate it. Candidates with zero posterior standard
/// deviation score exactly zero.
///
/// # Errors
///
/// Returns `Error::InvalidExplorationBias` for a negative or non-finite
/// `xi`, `Error::EmptyObservations` when nothing has been observed, and
/// any error raised by the surrogate.
pub fn expected_improvement(
    candidates: &[Vec<f64>],
    observations: &Observations,
    surrogate: &dyn Surrogate,
    xi: f64,
) -> Result<Vec<f64>> {
    validate_xi(xi)?;
    if observations.is_empty() {
        return Err(Error::EmptyObservations);
    }

    let prediction = surrogate.predict(candidates)?;
    let incumbent = surrogate
        .predict_mean(observations.inputs())?
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(prediction
        .mean
        .iter()
        .zip(&prediction.std)
        .map(|(&mu, &sigma)| improvement_from_moments(mu, sigma, incumbent, xi))
        .collect())
}

/// Closed-form Expected Improvement of a Gaussian `N(mu, sigma²)` over
/// `incumbent + xi`.
///
/// `EI = imp Φ(z) + sigma φ(z)` with `imp = mu − incumbent − xi` and
/// `z = imp / sigma`; `sigma == 0` gives `0`. Tail cancellation is
/// clamped so the result is never negative.
///
/// # Examples
///
/// ```
/// use gp_suggest::acquisition::improvement_from_moments;
///
/// assert_eq!(improvement_from_moments(5.0, 0.0, 1.0, 0.0), 0.0);
/// // At the incumbent with unit spread: φ(0) ≈ 0.3989.
/// assert!((improvement_from_moments(1.0, 1.0, 1.0, 0.0) - 0.398_942_280_4).abs() < 1e-9);
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
pub fn improvement_from_moments(mu: f64, sigma: f64, incumbent: f64, xi: f64) -> f64 {
    if sigma == 0.0 {
        return 0.0;
    }
    let imp = mu - incumbent - xi;
    let z = imp / sigma;
    (imp * norm_cdf(z) + sigma * norm_pdf(z)).max(0.0)
}

fn validate_xi(xi: f64) -> Result<()> {
    if xi.is_finite() && xi >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidExplorationBias(xi))
    }
}

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF.
fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / core::f64::consts::SQRT_2)
}
