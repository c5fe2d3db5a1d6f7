//! Observed `(input, output)` pairs of the black-box function.

use crate::error::{Error, Result};

/// The evaluation history supplied to a proposal.
///
/// Inputs share one dimensionality and every value is finite. The set may
/// be empty, in which case it has no dimensionality yet.
///
/// # Examples
///
/// ```
/// use gp_suggest::Observations;
///
/// let obs = Observations::new(vec![vec![0.0], vec![1.0]], vec![0.0, 1.0]).unwrap();
/// assert_eq!(obs.len(), 2);
/// assert_eq!(obs.dims(), Some(1));
///
/// // Ragged inputs are rejected.
/// assert!(Observations::new(vec![vec![0.0], vec![1.0, 2.0]], vec![0.0, 1.0]).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observations {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<f64>,
}

impl Observations {
    /// Creates an empty observation set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an observation set from parallel input and output sequences.
    ///
    /// # Errors
    ///
    /// Returns `Error::ObservationCountMismatch` if the lengths differ,
    /// `Error::DimensionMismatch` for ragged inputs and
    /// `Error::NonFiniteObservation` for NaN or infinite values.
    pub fn new(inputs: Vec<Vec<f64>>, outputs: Vec<f64>) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(Error::ObservationCountMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if let Some(first) = inputs.first() {
            let expected = first.len();
            for (index, (x, y)) in inputs.iter().zip(&outputs).enumerate() {
                check_point(x, *y, expected, index)?;
            }
        }
        Ok(Self { inputs, outputs })
    }

    /// Appends one observation.
    ///
    /// # Errors
    ///
    /// Same checks as [`Observations::new`], against the existing dimensionality.
    pub fn push(&mut self, x: Vec<f64>, y: f64) -> Result<()> {
        let expected = self.dims().unwrap_or(x.len());
        check_point(&x, y, expected, self.outputs.len())?;
        self.inputs.push(x);
        self.outputs.push(y);
        Ok(())
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if nothing has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Input dimensionality, or `None` for an empty set.
    #[must_use]
    pub fn dims(&self) -> Option<usize> {
        self.inputs.first().map(Vec::len)
    }

    /// Observed input locations (`n x d`).
    #[must_use]
    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    /// Observed scalar outputs (length `n`).
    #[must_use]
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }
}

fn check_point(x: &[f64], y: f64, expected: usize, index: usize) -> Result<()> {
    if x.len() != expected || x.is_empty() {
        return Err(Error::DimensionMismatch {
            expected,
            got: x.len(),
            index,
        });
    }
    if !y.is_finite() || x.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFiniteObservation { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_mismatch() {
        let err = Observations::new(vec![vec![0.0]], vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::ObservationCountMismatch {
                inputs: 1,
                outputs: 0
            }
        ));
    }

    #[test]
    fn ragged_inputs_report_index() {
        let err = Observations::new(
            vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![3.0]],
            vec![0.0, 1.0, 2.0],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                got: 1,
                index: 2
            }
        ));
    }

    #[test]
    fn non_finite_output_rejected() {
        let err = Observations::new(vec![vec![0.0]], vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteObservation { index: 0 }));
    }

    #[test]
    fn zero_dimensional_input_rejected() {
        assert!(Observations::new(vec![vec![]], vec![1.0]).is_err());
    }

    #[test]
    fn push_enforces_dimensionality() {
        let mut obs = Observations::empty();
        assert!(obs.is_empty());
        assert_eq!(obs.dims(), None);

        obs.push(vec![0.0, 0.0], 1.0).unwrap();
        obs.push(vec![1.0, 0.5], 2.0).unwrap();
        assert!(obs.push(vec![1.0], 3.0).is_err());
        assert!(obs.push(vec![1.0, f64::INFINITY], 3.0).is_err());

        assert_eq!(obs.len(), 2);
        assert_eq!(obs.dims(), Some(2));
        assert_eq!(obs.outputs(), &[1.0, 2.0]);
    }
}
