//! Bounded local optimizers used inside the restart loop.

mod lbfgsb;

pub use lbfgsb::{Lbfgsb, LbfgsbConfig};

use crate::error::Result;
use crate::space::Bounds;

/// The result of one local optimization run.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalOptimum {
    /// The best location found, inside the bounds.
    pub x: Vec<f64>,
    /// The objective value at `x`.
    pub value: f64,
    /// Solver iterations completed; zero when the solver stopped on an
    /// error and the best point seen so far was kept.
    pub iterations: usize,
}

/// Trait for box-constrained local minimizers.
///
/// Implementations treat the objective as a black box and must only
/// return locations inside `bounds`.
pub trait LocalOptimizer: Send + Sync {
    /// Minimizes `objective` starting from `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the run cannot start, e.g. the objective is
    /// not finite at `start`.
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        start: &[f64],
        bounds: &Bounds,
    ) -> Result<LocalOptimum>;
}
