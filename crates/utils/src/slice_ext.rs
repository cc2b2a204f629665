use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Check that bin edges are finite and strictly increasing
    ///
    /// At least two edges are needed to describe a single bin.
    ///
    /// ```rust
    /// # use ctools_utils::SliceExt;
    /// assert!([0.0_f64, 1.5, 3.0].check_ascending().is_ok());
    /// assert!([0.0_f64, 1.5, 1.5].check_ascending().is_err());
    /// assert!([0.0_f64].check_ascending().is_err());
    /// ```
    fn check_ascending(&self) -> Result<()>;
}

impl SliceExt<f64> for [f64] {
    fn check_ascending(&self) -> Result<()> {
        if self.len() < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: self.len(),
                minimum_required: 2,
            });
        }

        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        match self.windows(2).position(|pair| pair[0] >= pair[1]) {
            Some(i) => Err(Error::SliceNotAscending {
                index: i + 1,
                previous: self[i],
                value: self[i + 1],
            }),
            None => Ok(()),
        }
    }
}
