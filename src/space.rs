//! Axis-aligned search box.

use crate::error::{Error, Result};
use crate::rng_util;

/// An axis-aligned box of `(lower, upper)` pairs, one per input dimension.
///
/// Construction guarantees at least one dimension, finite ends and
/// `lower <= upper` in every dimension.
///
/// # Examples
///
/// ```
/// use gp_suggest::Bounds;
///
/// let bounds = Bounds::new([(-5.0, 5.0), (0.0, 1.0)]).unwrap();
/// assert_eq!(bounds.dims(), 2);
/// assert!(bounds.contains(&[0.0, 0.5]));
/// assert!(Bounds::new([(1.0, 0.0)]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    ranges: Vec<(f64, f64)>,
}

impl Bounds {
    /// Creates a box from `(lower, upper)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyBounds` if no pair is given and
    /// `Error::InvalidBounds` if a pair is non-finite or reversed.
    pub fn new(ranges: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let ranges: Vec<(f64, f64)> = ranges.into_iter().collect();
        if ranges.is_empty() {
            return Err(Error::EmptyBounds);
        }
        for (dim, &(low, high)) in ranges.iter().enumerate() {
            if !low.is_finite() || !high.is_finite() || low > high {
                return Err(Error::InvalidBounds { dim, low, high });
            }
        }
        Ok(Self { ranges })
    }

    /// Creates a box from `[lower, upper]` rows, the layout callers
    /// usually hold bounds in.
    ///
    /// # Errors
    ///
    /// Same as [`Bounds::new`].
    pub fn from_rows(rows: &[[f64; 2]]) -> Result<Self> {
        Self::new(rows.iter().map(|r| (r[0], r[1])))
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.ranges.len()
    }

    /// The `(lower, upper)` pairs.
    #[must_use]
    pub fn ranges(&self) -> &[(f64, f64)] {
        &self.ranges
    }

    /// Returns `true` if `x` has the right dimensionality and lies inside the box.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.ranges.len()
            && x
                .iter()
                .zip(&self.ranges)
                .all(|(&v, &(lo, hi))| (lo..=hi).contains(&v))
    }

    /// Projects `x` onto the box in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for (v, &(lo, hi)) in x.iter_mut().zip(&self.ranges) {
            *v = v.clamp(lo, hi);
        }
    }

    /// Draws one point uniformly at random, independently per dimension.
    #[must_use]
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f64> {
        self.ranges
            .iter()
            .map(|&(lo, hi)| rng_util::f64_range(rng, lo, hi))
            .collect()
    }
}
