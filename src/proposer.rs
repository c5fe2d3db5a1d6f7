//! Candidate proposer: fit a GP, then maximize an acquisition function with
//! restarted bounded local searches.
//!
//! # Algorithm overview
//!
//! 1. **Cold start**: with no observations, return a point drawn uniformly
//!    in the box; no model is fitted.
//! 2. **Fit GP**: a [`GaussianProcess`] with unit initial output and length
//!    scales and observation noise `noise` (default 0.2, added as `noise²`)
//!    is fitted to the full observation set. Nothing is kept between calls.
//! 3. **Restarts**: `n_restarts` (default 25) start points are drawn
//!    uniformly in the box. From each, the local optimizer minimizes the
//!    negated acquisition score. Restarts that fail or end on a non-finite
//!    value are skipped.
//! 4. **Reduce**: the restart with the strictly lowest objective wins; ties
//!    keep the earliest restart. If no restart succeeded the call fails with
//!    [`Error::NoCandidateFound`].
//!
//! All randomness flows through one `fastrand::Rng`, so a fixed seed makes
//! the proposal reproducible.
//!
//! # Examples
//!
//! ```
//! use gp_suggest::{Bounds, ExpectedImprovement, Observations, Proposer};
//!
//! let proposer = Proposer::with_seed(7);
//! let bounds = Bounds::new([(0.0, 2.0)]).unwrap();
//! let obs = Observations::new(vec![vec![0.0], vec![1.0]], vec![0.0, 1.0]).unwrap();
//!
//! let next = proposer
//!     .propose(&ExpectedImprovement::new(), &obs, &bounds)
//!     .unwrap();
//! assert!(bounds.contains(&next));
//! ```

use parking_lot::Mutex;

use crate::acquisition::AcquisitionFunction;
use crate::error::{Error, Result};
use crate::local::{Lbfgsb, LocalOptimizer, LocalOptimum};
use crate::observation::Observations;
use crate::rng_util;
use crate::space::Bounds;
use crate::surrogate::{GaussianProcess, Surrogate};

/// Default number of local-search restarts.
pub const DEFAULT_N_RESTARTS: usize = 25;
/// Default observation noise standard deviation of the surrogate.
pub const DEFAULT_NOISE: f64 = 0.2;

/// Tunables of a [`Proposer`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProposerConfig {
    /// Number of local-search restarts.
    pub n_restarts: usize,
    /// Observation noise standard deviation given to the surrogate.
    pub noise: f64,
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            n_restarts: DEFAULT_N_RESTARTS,
            noise: DEFAULT_NOISE,
        }
    }
}

impl ProposerConfig {
    fn validate(&self) -> Result<()> {
        if self.n_restarts == 0 {
            return Err(Error::InvalidRestarts);
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(Error::InvalidNoise(self.noise));
        }
        Ok(())
    }
}

/// The outcome of one proposal.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    /// The next location to evaluate.
    pub location: Vec<f64>,
    /// Acquisition score at `location`; `None` for a cold-start sample.
    pub acquisition_value: Option<f64>,
    /// Number of restarts that ended on a finite value.
    pub successful_restarts: usize,
}

/// Proposes the next location to evaluate.
///
/// The proposer owns its random generator behind a mutex, so it can be
/// shared across threads and called through `&self`.
///
/// # Examples
///
/// ```
/// use gp_suggest::{Bounds, ExpectedImprovement, Observations, Proposer};
///
/// let proposer = Proposer::builder().n_restarts(10).seed(42).build().unwrap();
/// let bounds = Bounds::new([(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
///
/// // Nothing observed yet: a uniform sample from the box.
/// let first = proposer
///     .suggest(&ExpectedImprovement::new(), &Observations::empty(), &bounds)
///     .unwrap();
/// assert_eq!(first.location.len(), 2);
/// assert_eq!(first.acquisition_value, None);
/// ```
pub struct Proposer {
    rng: Mutex<fastrand::Rng>,
    config: ProposerConfig,
    optimizer: Box<dyn LocalOptimizer>,
}

impl Proposer {
    /// Creates a proposer with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
            config: ProposerConfig::default(),
            optimizer: Box::new(Lbfgsb::new()),
        }
    }

    /// Creates a proposer with default settings and a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
            config: ProposerConfig::default(),
            optimizer: Box::new(Lbfgsb::new()),
        }
    }

    /// Creates a builder for configuring a `Proposer`.
    #[must_use]
    pub fn builder() -> ProposerBuilder {
        ProposerBuilder::new()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ProposerConfig {
        &self.config
    }

    /// Returns the next location to evaluate.
    ///
    /// # Errors
    ///
    /// See [`Proposer::suggest`].
    pub fn propose(
        &self,
        acquisition: &dyn AcquisitionFunction,
        observations: &Observations,
        bounds: &Bounds,
    ) -> Result<Vec<f64>> {
        self.suggest(acquisition, observations, bounds)
            .map(|p| p.location)
    }

    /// Returns the next location together with search diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `Error::BoundsDimensionMismatch` if the box and the
    /// observations disagree on dimensionality, any surrogate fitting error,
    /// and `Error::NoCandidateFound` if every restart failed.
    pub fn suggest(
        &self,
        acquisition: &dyn AcquisitionFunction,
        observations: &Observations,
        bounds: &Bounds,
    ) -> Result<Proposal> {
        let mut rng = self.rng.lock();
        suggest_with(
            &self.config,
            self.optimizer.as_ref(),
            acquisition,
            observations,
            bounds,
            &mut rng,
        )
    }
}

impl Default for Proposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Proposer`].
///
/// All options have sensible defaults:
/// - `n_restarts`: 25
/// - `noise`: 0.2
/// - `seed`: random
/// - `optimizer`: [`Lbfgsb`] with its default configuration
#[derive(Default)]
pub struct ProposerBuilder {
    n_restarts: Option<usize>,
    noise: Option<f64>,
    seed: Option<u64>,
    optimizer: Option<Box<dyn LocalOptimizer>>,
}

impl ProposerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of local-search restarts.
    ///
    /// Default: 25.
    #[must_use]
    pub fn n_restarts(mut self, n: usize) -> Self {
        self.n_restarts = Some(n);
        self
    }

    /// Sets the observation noise standard deviation of the surrogate.
    ///
    /// Default: 0.2.
    #[must_use]
    pub fn noise(mut self, noise: f64) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the bounded local optimizer run from each restart.
    #[must_use]
    pub fn optimizer(mut self, optimizer: impl LocalOptimizer + 'static) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    /// Builds the configured [`Proposer`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRestarts` for zero restarts and
    /// `Error::InvalidNoise` for a negative or non-finite noise.
    pub fn build(self) -> Result<Proposer> {
        let config = ProposerConfig {
            n_restarts: self.n_restarts.unwrap_or(DEFAULT_N_RESTARTS),
            noise: self.noise.unwrap_or(DEFAULT_NOISE),
        };
        config.validate()?;
        Ok(Proposer {
            rng: Mutex::new(rng_util::seeded(self.seed)),
            config,
            optimizer: self
                .optimizer
                .unwrap_or_else(|| Box::new(Lbfgsb::new())),
        })
    }
}

/// Proposes the next location from plain slices with the default settings.
///
/// `x_obs` is `n x d`, `y_obs` has length `n` and `bounds` holds `d`
/// `(lower, upper)` pairs. The caller supplies the random generator used
/// for cold-start sampling and restart points.
///
/// # Errors
///
/// Returns a shape or bounds error for malformed inputs, otherwise the
/// errors of [`Proposer::suggest`].
///
/// # Examples
///
/// ```
/// use gp_suggest::{ExpectedImprovement, generate_parameters};
///
/// let mut rng = fastrand::Rng::with_seed(1);
/// let x = generate_parameters(
///     &ExpectedImprovement::new(),
///     &[],
///     &[],
///     &[(-5.0, 5.0), (-5.0, 5.0)],
///     &mut rng,
/// )
/// .unwrap();
/// assert!(x.iter().all(|v| (-5.0..=5.0).contains(v)));
/// ```
pub fn generate_parameters(
    acquisition: &dyn AcquisitionFunction,
    x_obs: &[Vec<f64>],
    y_obs: &[f64],
    bounds: &[(f64, f64)],
    rng: &mut fastrand::Rng,
) -> Result<Vec<f64>> {
    let observations = Observations::new(x_obs.to_vec(), y_obs.to_vec())?;
    let bounds = Bounds::new(bounds.iter().copied())?;
    suggest_with(
        &ProposerConfig::default(),
        &Lbfgsb::new(),
        acquisition,
        &observations,
        &bounds,
        rng,
    )
    .map(|p| p.location)
}

fn suggest_with(
    config: &ProposerConfig,
    optimizer: &dyn LocalOptimizer,
    acquisition: &dyn AcquisitionFunction,
    observations: &Observations,
    bounds: &Bounds,
    rng: &mut fastrand::Rng,
) -> Result<Proposal> {
    let Some(dims) = observations.dims() else {
        trace_debug!(dims = bounds.dims(), "no observations, sampling uniformly");
        return Ok(Proposal {
            location: bounds.sample(rng),
            acquisition_value: None,
            successful_restarts: 0,
        });
    };
    if dims != bounds.dims() {
        return Err(Error::BoundsDimensionMismatch {
            bounds: bounds.dims(),
            observations: dims,
        });
    }

    let mut gp = GaussianProcess::builder().noise(config.noise).build()?;
    gp.fit(observations.inputs(), observations.outputs())?;

    let starts: Vec<Vec<f64>> = (0..config.n_restarts)
        .map(|_| bounds.sample(rng))
        .collect();
    let objective = |x: &[f64]| {
        acquisition
            .evaluate(&[x.to_vec()], observations, &gp)
            .ok()
            .and_then(|scores| scores.first().copied())
            .map_or(f64::NAN, |score| -score)
    };

    let (best, successful_restarts) = starts
        .iter()
        .map(|start| {
            optimizer
                .minimize(&objective, start, bounds)
                .ok()
                .filter(|opt| opt.value.is_finite())
        })
        .fold((None::<LocalOptimum>, 0), |(best, n), outcome| match outcome {
            Some(opt) if best.as_ref().is_none_or(|b| opt.value < b.value) => (Some(opt), n + 1),
            Some(_) => (best, n + 1),
            None => (best, n),
        });

    if successful_restarts < config.n_restarts {
        trace_debug!(
            failed = config.n_restarts - successful_restarts,
            "restarts without a finite result"
        );
    }
    let Some(best) = best else {
        return Err(Error::NoCandidateFound {
            restarts: config.n_restarts,
        });
    };

    let mut location = best.x;
    bounds.clamp(&mut location);
    let acquisition_value = -best.value;
    trace_info!(
        acquisition_value,
        successful_restarts,
        "candidate proposed"
    );
    Ok(Proposal {
        location,
        acquisition_value: Some(acquisition_value),
        successful_restarts,
    })
}
