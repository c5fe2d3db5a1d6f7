#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! One step of Gaussian-process Bayesian optimization: fit a surrogate to the
//! points evaluated so far and propose the next point by maximizing
//! Expected Improvement with restarted, box-constrained L-BFGS searches.
//!
//! # Getting Started
//!
//! ```
//! use gp_suggest::prelude::*;
//!
//! let bounds = Bounds::new([(0.0, 2.0)]).unwrap();
//! let proposer = Proposer::with_seed(42);
//! let mut obs = Observations::empty();
//!
//! for _ in 0..4 {
//!     let x = proposer
//!         .propose(&ExpectedImprovement::new(), &obs, &bounds)
//!         .unwrap();
//!     let y = -(x[0] - 1.3).powi(2);
//!     obs.push(x, y).unwrap();
//! }
//! assert_eq!(obs.len(), 4);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Observations`] | Evaluated `(input, output)` pairs, validated for shape and finiteness. |
//! | [`Bounds`] | The axis-aligned search box. |
//! | [`Surrogate`](surrogate::Surrogate) | Model with mean and standard deviation predictions; default [`GaussianProcess`](surrogate::GaussianProcess). |
//! | [`AcquisitionFunction`](acquisition::AcquisitionFunction) | Scores candidates, higher is better; default [`ExpectedImprovement`](acquisition::ExpectedImprovement). |
//! | [`LocalOptimizer`](local::LocalOptimizer) | Bounded local minimizer run from each restart; default [`Lbfgsb`](local::Lbfgsb). |
//! | [`Proposer`] | Fits the surrogate and runs the restart loop. |
//!
//! The outputs are **maximized**: Expected Improvement is measured above the
//! best posterior mean at the observed inputs.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on [`Bounds`], [`Observations`], [`ProposerConfig`] and [`GpConfig`](surrogate::GpConfig) | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) when fitting and proposing | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
mod error;
pub mod local;
mod observation;
mod proposer;
mod rng_util;
mod space;
pub mod surrogate;

pub use acquisition::{AcquisitionFunction, ExpectedImprovement, expected_improvement};
pub use error::{Error, Result};
pub use local::{Lbfgsb, LbfgsbConfig, LocalOptimizer, LocalOptimum};
pub use observation::Observations;
pub use proposer::{
    DEFAULT_N_RESTARTS, DEFAULT_NOISE, Proposal, Proposer, ProposerBuilder, ProposerConfig,
    generate_parameters,
};
pub use space::Bounds;
pub use surrogate::{GaussianProcess, GaussianProcessBuilder, GpConfig, Prediction, Surrogate};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use gp_suggest::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{AcquisitionFunction, ExpectedImprovement, expected_improvement};
    pub use crate::error::{Error, Result};
    pub use crate::local::{Lbfgsb, LocalOptimizer};
    pub use crate::observation::Observations;
    pub use crate::proposer::{Proposal, Proposer, ProposerBuilder, generate_parameters};
    pub use crate::space::Bounds;
    pub use crate::surrogate::{GaussianProcess, Surrogate};
}
