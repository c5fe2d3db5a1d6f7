//! Gaussian process regression with a Matérn 5/2 kernel.
//!
//! The covariance is `Constant(c) * Matern(l, nu = 5/2)` with an isotropic
//! length scale, plus a fixed observation-noise variance `noise²` on the
//! diagonal. The prior mean is zero.
//!
//! # Algorithm overview
//!
//! 1. **Tune** (optional, on by default): maximize the log marginal
//!    likelihood over `(ln c, ln l)` with [`Lbfgsb`], starting from the
//!    configured values and staying inside the hyperparameter bounds.
//! 2. **Factorize**: Cholesky decomposition `K + noise² I = L Lᵀ` and
//!    `α = (K + noise² I)⁻¹ y`.
//! 3. **Predict**: mean `k*ᵀ α`, variance `c − k*ᵀ (K + noise² I)⁻¹ k*`
//!    clamped at zero.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `constant` | 1.0 | Initial output scale `c` |
//! | `length_scale` | 1.0 | Initial length scale `l` |
//! | `noise` | 1e-5 | Observation noise standard deviation |
//! | `optimize_hyperparameters` | true | Tune `c` and `l` on every fit |
//! | `hyperparameter_bounds` | (1e-5, 1e5) | Box for `c` and `l` while tuning |
//!
//! # Examples
//!
//! ```
//! use gp_suggest::{GaussianProcess, Surrogate};
//!
//! let mut gp = GaussianProcess::builder()
//!     .noise(0.2)
//!     .optimize_hyperparameters(false)
//!     .build()
//!     .unwrap();
//! gp.fit(&[vec![0.0], vec![1.0]], &[0.0, 1.0]).unwrap();
//!
//! let prediction = gp.predict(&[vec![0.5], vec![10.0]]).unwrap();
//! assert!(prediction.std[0] < prediction.std[1]);
//! ```

use nalgebra::{DMatrix, DVector, Dyn, linalg::Cholesky};

use crate::error::{Error, Result};
use crate::local::{Lbfgsb, LocalOptimizer};
use crate::space::Bounds;

use super::{Prediction, Surrogate};

const DEFAULT_CONSTANT: f64 = 1.0;
const DEFAULT_LENGTH_SCALE: f64 = 1.0;
const DEFAULT_NOISE: f64 = 1e-5;
const DEFAULT_HYPERPARAMETER_BOUNDS: (f64, f64) = (1e-5, 1e5);

/// √5.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Hyperparameters and fitting options of a [`GaussianProcess`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpConfig {
    /// Initial output scale.
    pub constant: f64,
    /// Initial length scale.
    pub length_scale: f64,
    /// Observation noise standard deviation; `noise²` is added to the kernel diagonal.
    pub noise: f64,
    /// Whether `fit` tunes `constant` and `length_scale` by maximum likelihood.
    pub optimize_hyperparameters: bool,
    /// Bounds applied to both hyperparameters while tuning.
    pub hyperparameter_bounds: (f64, f64),
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            constant: DEFAULT_CONSTANT,
            length_scale: DEFAULT_LENGTH_SCALE,
            noise: DEFAULT_NOISE,
            optimize_hyperparameters: true,
            hyperparameter_bounds: DEFAULT_HYPERPARAMETER_BOUNDS,
        }
    }
}

impl GpConfig {
    fn validate(&self) -> Result<()> {
        for v in [self.constant, self.length_scale] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidHyperparameter(v));
            }
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(Error::InvalidNoise(self.noise));
        }
        let (lo, hi) = self.hyperparameter_bounds;
        if !lo.is_finite() || lo <= 0.0 {
            return Err(Error::InvalidHyperparameter(lo));
        }
        if !hi.is_finite() || hi < lo {
            return Err(Error::InvalidHyperparameter(hi));
        }
        Ok(())
    }
}

/// Gaussian process surrogate.
///
/// Every call to [`fit`](Surrogate::fit) starts again from the configured
/// hyperparameters, so refitting on the same data always gives the same
/// model.
#[derive(Debug)]
pub struct GaussianProcess {
    config: GpConfig,
    fitted: Option<FittedGp>,
}

impl GaussianProcess {
    /// Creates an unfitted GP with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GpConfig::default(),
            fitted: None,
        }
    }

    /// Creates an unfitted GP from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a hyperparameter, the noise or the
    /// hyperparameter bounds are out of range.
    pub fn with_config(config: GpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fitted: None,
        })
    }

    /// Creates a builder for configuring a `GaussianProcess`.
    #[must_use]
    pub fn builder() -> GaussianProcessBuilder {
        GaussianProcessBuilder::new()
    }

    /// The configuration this GP was built with.
    #[must_use]
    pub fn config(&self) -> &GpConfig {
        &self.config
    }

    /// Returns `true` once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fitted output scale, if fitted.
    #[must_use]
    pub fn constant(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.constant)
    }

    /// Fitted length scale, if fitted.
    #[must_use]
    pub fn length_scale(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.length_scale)
    }

    /// Log marginal likelihood of the training data under the fitted model.
    #[must_use]
    pub fn log_marginal_likelihood(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.log_marginal_likelihood)
    }

    /// Maximizes the log marginal likelihood over the log hyperparameters.
    ///
    /// Falls back to the initial values when the likelihood cannot be
    /// evaluated there.
    fn tune(&self, x: &[Vec<f64>], y: &[f64], noise_var: f64) -> Result<(f64, f64)> {
        let initial = (self.config.constant, self.config.length_scale);
        let (lo, hi) = self.config.hyperparameter_bounds;
        let space = Bounds::new([(lo.ln(), hi.ln()), (lo.ln(), hi.ln())])?;
        let start = [initial.0.ln(), initial.1.ln()];

        let neg_lml = |theta: &[f64]| {
            factorize(x, y, theta[0].exp(), theta[1].exp(), noise_var)
                .map_or(f64::INFINITY, |f| -f.log_marginal_likelihood)
        };
        match Lbfgsb::new().minimize(&neg_lml, &start, &space) {
            Ok(opt) => Ok((opt.x[0].exp(), opt.x[1].exp())),
            Err(_) => {
                trace_debug!("log marginal likelihood not finite at the initial hyperparameters");
                Ok(initial)
            }
        }
    }
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`GaussianProcess`].
///
/// # Examples
///
/// ```
/// use gp_suggest::GaussianProcessBuilder;
///
/// let gp = GaussianProcessBuilder::new()
///     .length_scale(0.5)
///     .noise(0.1)
///     .optimize_hyperparameters(false)
///     .build()
///     .unwrap();
/// assert_eq!(gp.config().length_scale, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GaussianProcessBuilder {
    config: GpConfig,
}

impl GaussianProcessBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial output scale `c`.
    ///
    /// Default: 1.0.
    #[must_use]
    pub fn constant(mut self, c: f64) -> Self {
        self.config.constant = c;
        self
    }

    /// Sets the initial length scale `l`.
    ///
    /// Default: 1.0.
    #[must_use]
    pub fn length_scale(mut self, l: f64) -> Self {
        self.config.length_scale = l;
        self
    }

    /// Sets the observation noise standard deviation. Its square is
    /// added to the kernel diagonal.
    ///
    /// Default: 1e-5.
    #[must_use]
    pub fn noise(mut self, noise: f64) -> Self {
        self.config.noise = noise;
        self
    }

    /// Enables or disables maximum-likelihood tuning of `c` and `l`.
    ///
    /// Default: enabled.
    #[must_use]
    pub fn optimize_hyperparameters(mut self, enabled: bool) -> Self {
        self.config.optimize_hyperparameters = enabled;
        self
    }

    /// Sets the box both hyperparameters are kept in while tuning.
    ///
    /// Default: `(1e-5, 1e5)`.
    #[must_use]
    pub fn hyperparameter_bounds(mut self, low: f64, high: f64) -> Self {
        self.config.hyperparameter_bounds = (low, high);
        self
    }

    /// Builds the configured [`GaussianProcess`].
    ///
    /// # Errors
    ///
    /// Returns an error if any setting is out of range.
    pub fn build(self) -> Result<GaussianProcess> {
        GaussianProcess::with_config(self.config)
    }
}

/// A factorized GP ready for predictions.
#[derive(Debug)]
struct FittedGp {
    /// Cholesky factor of `K + noise² I`.
    cholesky: Cholesky<f64, Dyn>,
    /// `(K + noise² I)⁻¹ y`.
    alpha: DVector<f64>,
    x_train: Vec<Vec<f64>>,
    constant: f64,
    length_scale: f64,
    log_marginal_likelihood: f64,
}

/// Matérn 5/2 kernel scaled by `constant`.
///
/// `k(a, b) = c (1 + √5 r + 5/3 r²) exp(-√5 r)` with `r = ‖a − b‖ / l`.
fn matern52(a: &[f64], b: &[f64], length_scale: f64, constant: f64) -> f64 {
    let r_sq = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = (x - y) / length_scale;
            diff * diff
        })
        .sum::<f64>();
    let sqrt5_r = SQRT_5 * r_sq.sqrt();
    constant * (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

/// Factorize the kernel matrix; `None` if it is not positive definite.
#[allow(clippy::cast_precision_loss)]
fn factorize(
    x: &[Vec<f64>],
    y: &[f64],
    constant: f64,
    length_scale: f64,
    noise_var: f64,
) -> Option<FittedGp> {
    let n = x.len();
    let k = DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], length_scale, constant);
        if i == j { k + noise_var } else { k }
    });
    let cholesky = Cholesky::new(k)?;

    let y_vec = DVector::from_column_slice(y);
    let alpha = cholesky.solve(&y_vec);

    let half_log_det: f64 = cholesky.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let log_marginal_likelihood = -0.5 * y_vec.dot(&alpha)
        - half_log_det
        - 0.5 * n as f64 * (2.0 * core::f64::consts::PI).ln();
    if !log_marginal_likelihood.is_finite() {
        return None;
    }

    Some(FittedGp {
        cholesky,
        alpha,
        x_train: x.to_vec(),
        constant,
        length_scale,
        log_marginal_likelihood,
    })
}

impl Surrogate for GaussianProcess {
    fn fit(&mut self, inputs: &[Vec<f64>], outputs: &[f64]) -> Result<()> {
        self.fitted = None;
        if inputs.len() != outputs.len() {
            return Err(Error::ObservationCountMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        let Some(first) = inputs.first() else {
            return Err(Error::EmptyObservations);
        };
        let dims = first.len();
        if let Some(index) = inputs.iter().position(|x| x.len() != dims) {
            return Err(Error::DimensionMismatch {
                expected: dims,
                got: inputs[index].len(),
                index,
            });
        }

        let noise_var = self.config.noise * self.config.noise;
        let (constant, length_scale) = if self.config.optimize_hyperparameters {
            self.tune(inputs, outputs, noise_var)?
        } else {
            (self.config.constant, self.config.length_scale)
        };

        let fitted = factorize(inputs, outputs, constant, length_scale, noise_var)
            .ok_or(Error::ModelFit("kernel matrix is not positive definite"))?;
        trace_debug!(
            n = inputs.len(),
            constant,
            length_scale,
            log_marginal_likelihood = fitted.log_marginal_likelihood,
            "gaussian process fitted"
        );
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Prediction> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        let dims = fitted.x_train[0].len();

        let mut mean = Vec::with_capacity(x.len());
        let mut std = Vec::with_capacity(x.len());
        for (index, point) in x.iter().enumerate() {
            if point.len() != dims {
                return Err(Error::DimensionMismatch {
                    expected: dims,
                    got: point.len(),
                    index,
                });
            }
            let k_star = DVector::from_fn(fitted.x_train.len(), |i, _| {
                matern52(point, &fitted.x_train[i], fitted.length_scale, fitted.constant)
            });
            mean.push(k_star.dot(&fitted.alpha));

            let v = fitted.cholesky.solve(&k_star);
            let var = (fitted.constant - k_star.dot(&v)).max(0.0);
            std.push(var.sqrt());
        }
        Ok(Prediction { mean, std })
    }

    fn predict_mean(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        let dims = fitted.x_train[0].len();

        x.iter()
            .enumerate()
            .map(|(index, point)| {
                if point.len() != dims {
                    return Err(Error::DimensionMismatch {
                        expected: dims,
                        got: point.len(),
                        index,
                    });
                }
                Ok(fitted
                    .x_train
                    .iter()
                    .zip(fitted.alpha.iter())
                    .map(|(xi, a)| matern52(point, xi, fitted.length_scale, fitted.constant) * a)
                    .sum())
            })
            .collect()
    }
}
