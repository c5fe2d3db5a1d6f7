//! Box-constrained L-BFGS on top of [`argmin`].
//!
//! The objective is wrapped in an argmin problem that clamps every
//! parameter onto the box before evaluating it, so the objective is never
//! called outside the bounds. Gradients are one-sided finite differences
//! that step into the box; components that would push a coordinate
//! through an active bound are zeroed. The lowest finite value seen during
//! the run is kept, so a solver error part-way through still yields a
//! usable point.

use core::cell::RefCell;

use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;

use crate::error::{Error, Result};
use crate::space::Bounds;

use super::{LocalOptimizer, LocalOptimum};

type ArgminResult<T> = core::result::Result<T, argmin::core::Error>;
type Solver = LBFGS<MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64>, Vec<f64>, Vec<f64>, f64>;

/// Tuning knobs for [`Lbfgsb`].
///
/// | Field | Default |
/// |-------|---------|
/// | `memory` | 10 |
/// | `max_iterations` | 200 |
/// | `pgtol` | 1e-5 |
/// | `ftol` | 2.2e-9 |
/// | `fd_step` | 1e-8 |
/// | `armijo` | 1e-4 |
/// | `curvature` | 0.9 |
#[derive(Clone, Debug, PartialEq)]
pub struct LbfgsbConfig {
    /// Number of curvature pairs kept for the inverse Hessian estimate.
    pub memory: usize,
    /// Maximum number of solver iterations.
    pub max_iterations: usize,
    /// Stop once the norm of the projected gradient falls below this.
    pub pgtol: f64,
    /// Stop once the change of the objective between iterations falls below this.
    pub ftol: f64,
    /// Relative finite-difference step.
    pub fd_step: f64,
    /// Sufficient-decrease constant of the More-Thuente line search.
    pub armijo: f64,
    /// Curvature constant of the More-Thuente line search.
    pub curvature: f64,
}

impl Default for LbfgsbConfig {
    fn default() -> Self {
        Self {
            memory: 10,
            max_iterations: 200,
            pgtol: 1e-5,
            ftol: 2.2e-9,
            fd_step: 1e-8,
            armijo: 1e-4,
            curvature: 0.9,
        }
    }
}

/// Box-constrained L-BFGS minimizer.
///
/// # Examples
///
/// ```
/// use gp_suggest::{Bounds, Lbfgsb, LocalOptimizer};
///
/// let bounds = Bounds::new([(-2.0, 2.0), (-2.0, 2.0)]).unwrap();
/// let sphere = |x: &[f64]| (x[0] - 0.5).powi(2) + (x[1] + 0.25).powi(2);
///
/// let opt = Lbfgsb::new().minimize(&sphere, &[1.5, 1.5], &bounds).unwrap();
/// assert!((opt.x[0] - 0.5).abs() < 1e-3);
/// assert!((opt.x[1] + 0.25).abs() < 1e-3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Lbfgsb {
    config: LbfgsbConfig,
}

impl Lbfgsb {
    /// Creates a minimizer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a minimizer with a custom configuration.
    #[must_use]
    pub fn with_config(config: LbfgsbConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &LbfgsbConfig {
        &self.config
    }

    fn solver(&self) -> Result<Solver> {
        let linesearch = MoreThuenteLineSearch::new()
            .with_c(self.config.armijo, self.config.curvature)
            .map_err(|_| {
                Error::OptimizerFailed("line search constants must satisfy 0 < armijo < curvature < 1")
            })?;
        LBFGS::new(linesearch, self.config.memory.max(1))
            .with_tolerance_grad(self.config.pgtol)
            .and_then(|s| s.with_tolerance_cost(self.config.ftol))
            .map_err(|_| Error::OptimizerFailed("tolerances must be non-negative"))
    }
}

/// Lowest finite value evaluated so far.
struct Best {
    x: Vec<f64>,
    value: f64,
}

/// Argmin view of a black-box objective restricted to a box.
struct BoxedObjective<'a> {
    objective: &'a dyn Fn(&[f64]) -> f64,
    bounds: &'a Bounds,
    fd_step: f64,
    best: &'a RefCell<Best>,
}

impl BoxedObjective<'_> {
    fn clamped(&self, param: &[f64]) -> Vec<f64> {
        let mut x = param.to_vec();
        self.bounds.clamp(&mut x);
        x
    }

    fn evaluate(&self, x: &[f64]) -> ArgminResult<f64> {
        let value = (self.objective)(x);
        if !value.is_finite() {
            return Err(argmin::core::Error::msg("objective is not finite"));
        }
        let mut best = self.best.borrow_mut();
        if value < best.value {
            best.x = x.to_vec();
            best.value = value;
        }
        Ok(value)
    }
}

impl CostFunction for BoxedObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> ArgminResult<Self::Output> {
        self.evaluate(&self.clamped(param))
    }
}

impl Gradient for BoxedObjective<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> ArgminResult<Self::Gradient> {
        let x = self.clamped(param);
        let fx = self.evaluate(&x)?;
        let mut grad = forward_difference(self.objective, &x, fx, self.bounds, self.fd_step);
        if grad.iter().any(|g| !g.is_finite()) {
            return Err(argmin::core::Error::msg("gradient is not finite"));
        }
        project(&x, &mut grad, self.bounds);
        Ok(grad)
    }
}

impl LocalOptimizer for Lbfgsb {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        start: &[f64],
        bounds: &Bounds,
    ) -> Result<LocalOptimum> {
        if start.len() != bounds.dims() {
            return Err(Error::DimensionMismatch {
                expected: bounds.dims(),
                got: start.len(),
                index: 0,
            });
        }

        let mut x0 = start.to_vec();
        bounds.clamp(&mut x0);
        let f0 = objective(&x0);
        if !f0.is_finite() {
            return Err(Error::OptimizerFailed(
                "objective is not finite at the start point",
            ));
        }

        let best = RefCell::new(Best {
            x: x0.clone(),
            value: f0,
        });
        let problem = BoxedObjective {
            objective,
            bounds,
            fd_step: self.config.fd_step,
            best: &best,
        };
        let solver = self.solver()?;
        let max_iters = u64::try_from(self.config.max_iterations).unwrap_or(u64::MAX);

        let run = Executor::new(problem, solver)
            .configure(|state| state.param(x0).max_iters(max_iters))
            .run();
        let iterations = match run {
            Ok(res) => usize::try_from(res.state().get_iter()).unwrap_or(usize::MAX),
            Err(_) => {
                trace_debug!("L-BFGS stopped early, keeping the best point seen");
                0
            }
        };

        let Best { x, value } = best.into_inner();
        Ok(LocalOptimum {
            x,
            value,
            iterations,
        })
    }
}

/// One-sided finite differences that step into the box. Coordinates with
/// no room on either side get a zero derivative.
fn forward_difference(
    objective: &dyn Fn(&[f64]) -> f64,
    x: &[f64],
    fx: f64,
    bounds: &Bounds,
    fd_step: f64,
) -> Vec<f64> {
    let mut shifted = x.to_vec();
    let mut grad = vec![0.0; x.len()];
    for (i, &(lo, hi)) in bounds.ranges().iter().enumerate() {
        let h = fd_step * x[i].abs().max(1.0);
        let step = if x[i] + h <= hi {
            h
        } else if x[i] - h >= lo {
            -h
        } else {
            continue;
        };
        shifted[i] = x[i] + step;
        grad[i] = (objective(&shifted) - fx) / step;
        shifted[i] = x[i];
    }
    grad
}

/// Zero the gradient components whose descent step would leave the box
/// through an active bound.
fn project(x: &[f64], grad: &mut [f64], bounds: &Bounds) {
    for ((g, &xi), &(lo, hi)) in grad.iter_mut().zip(x).zip(bounds.ranges()) {
        if (xi <= lo && *g > 0.0) || (xi >= hi && *g < 0.0) {
            *g = 0.0;
        }
    }
}
