/// Errors raised while validating inputs, fitting the surrogate or
/// searching for a candidate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a bound is non-finite or its lower end exceeds its upper end.
    #[error(
        "invalid bounds in dimension {dim}: low ({low}) must be finite and less than or equal to high ({high})"
    )]
    InvalidBounds {
        /// The offending dimension.
        dim: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when the search box has no dimensions.
    #[error("bounds must contain at least one dimension")]
    EmptyBounds,

    /// Returned when an input vector does not have the expected dimensionality.
    #[error("dimension mismatch: expected {expected} dimensions but point {index} has {got}")]
    DimensionMismatch {
        /// The expected number of dimensions.
        expected: usize,
        /// The actual number of dimensions of the point.
        got: usize,
        /// The index of the mismatched point.
        index: usize,
    },

    /// Returned when the search box and the observed inputs disagree on dimensionality.
    #[error(
        "bounds dimension mismatch: bounds have {bounds} dimensions but observations have {observations}"
    )]
    BoundsDimensionMismatch {
        /// Dimensionality of the search box.
        bounds: usize,
        /// Dimensionality of the observed inputs.
        observations: usize,
    },

    /// Returned when the number of inputs differs from the number of outputs.
    #[error("observation count mismatch: {inputs} inputs but {outputs} outputs")]
    ObservationCountMismatch {
        /// The number of input vectors.
        inputs: usize,
        /// The number of output values.
        outputs: usize,
    },

    /// Returned when an observation contains NaN or an infinity.
    #[error("observation {index} contains a non-finite value")]
    NonFiniteObservation {
        /// The index of the offending observation.
        index: usize,
    },

    /// Returned when an acquisition function is evaluated without observations.
    #[error("no observations available")]
    EmptyObservations,

    /// Returned when the exploration bias `xi` is negative or non-finite.
    #[error("invalid exploration bias: {0} must be finite and non-negative")]
    InvalidExplorationBias(f64),

    /// Returned when the observation noise is negative or non-finite.
    #[error("invalid noise: {0} must be finite and non-negative")]
    InvalidNoise(f64),

    /// Returned when a kernel hyperparameter is not strictly positive.
    #[error("invalid kernel hyperparameter: {0} must be finite and positive")]
    InvalidHyperparameter(f64),

    /// Returned when the restart count is zero.
    #[error("the number of restarts must be at least one")]
    InvalidRestarts,

    /// Returned when a surrogate is queried before it has been fitted.
    #[error("surrogate model has not been fitted")]
    NotFitted,

    /// Returned when the surrogate cannot be fitted to the observations.
    #[error("surrogate fit failed: {0}")]
    ModelFit(&'static str),

    /// Returned when the local optimizer cannot run from a start point.
    #[error("local optimizer failed: {0}")]
    OptimizerFailed(&'static str),

    /// Returned when no restart produced a finite acquisition value.
    #[error("no candidate found after {restarts} restarts")]
    NoCandidateFound {
        /// The number of restarts attempted.
        restarts: usize,
    },
}

/// A specialized `Result` type for this crate.
pub type Result<T> = core::result::Result<T, Error>;
