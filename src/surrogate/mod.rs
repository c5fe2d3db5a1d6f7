//! Probabilistic surrogate models of the black-box function.
//!
//! A [`Surrogate`] is fitted to the observations and then queried for a
//! posterior mean and standard deviation at arbitrary points. The crate
//! ships a Gaussian process ([`GaussianProcess`]); any model exposing the
//! same two operations can be plugged into the acquisition functions.

pub mod gp;

pub use gp::{GaussianProcess, GaussianProcessBuilder, GpConfig};

use crate::error::Result;

/// Posterior moments at a batch of query points.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Posterior mean per query point.
    pub mean: Vec<f64>,
    /// Posterior standard deviation per query point (never negative).
    pub std: Vec<f64>,
}

/// A regression model with uncertainty estimates.
pub trait Surrogate: Send + Sync {
    /// Fits the model to `inputs` (`n x d`) and `outputs` (length `n`),
    /// replacing any previous fit.
    ///
    /// # Errors
    ///
    /// Returns an error for inconsistent shapes or when the model cannot
    /// be fitted to the data.
    fn fit(&mut self, inputs: &[Vec<f64>], outputs: &[f64]) -> Result<()>;

    /// Predicts the posterior mean and standard deviation at `x` (`m x d`).
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong
    /// dimensionality.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Prediction>;

    /// Predicts only the posterior mean at `x`.
    ///
    /// # Errors
    ///
    /// Same as [`Surrogate::predict`].
    fn predict_mean(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(self.predict(x)?.mean)
    }
}
