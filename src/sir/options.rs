//! sir::options — configuration for fitting a SIR model.
//!
//! `SirOptions` collects the slice count, the number of directions, and the
//! whitening policy. Unset counts resolve against the predictor dimension at
//! fit time: `max(8, p + 3)` slices and `min(5, p)` directions.
use crate::linalg::Whitening;
use crate::sir::errors::{SirError, SirResult};

/// Options for [`SlicedInverseRegression::fit`](crate::sir::model::SlicedInverseRegression::fit).
///
/// Fields
/// ------
/// - `nslice`: `Option<usize>` — requested slice count (≥ 2); `None` uses
///   [`default_nslice`].
/// - `ndir`: `Option<usize>` — directions to return (≥ 1); `None` uses
///   [`default_ndir`]. Values above `p` are clamped with a diagnostic.
/// - `whitening`: [`Whitening`] — symmetric by default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SirOptions {
    pub nslice: Option<usize>,
    pub ndir: Option<usize>,
    pub whitening: Whitening,
}

impl SirOptions {
    /// Build validated options.
    ///
    /// Errors
    /// ------
    /// - `SirError::InvalidSliceCount` when `nslice < 2`.
    /// - `SirError::InvalidDirectionCount` when `ndir == 0`.
    pub fn new(
        nslice: Option<usize>, ndir: Option<usize>, whitening: Whitening,
    ) -> SirResult<Self> {
        if let Some(nslice) = nslice {
            verify_nslice(nslice)?;
        }
        if let Some(ndir) = ndir {
            verify_ndir(ndir)?;
        }
        Ok(Self { nslice, ndir, whitening })
    }

    /// Slice count for `p` predictors.
    pub fn resolved_nslice(&self, p: usize) -> usize {
        self.nslice.unwrap_or_else(|| default_nslice(p))
    }

    /// Direction count for `p` predictors.
    pub fn resolved_ndir(&self, p: usize) -> usize {
        self.ndir.unwrap_or_else(|| default_ndir(p))
    }
}

/// Default slice count: `max(8, p + 3)`.
pub fn default_nslice(p: usize) -> usize {
    8.max(p + 3)
}

/// Default direction count: `min(5, p)`.
pub fn default_ndir(p: usize) -> usize {
    5.min(p)
}

pub(crate) fn verify_nslice(nslice: usize) -> SirResult<()> {
    if nslice < 2 {
        return Err(SirError::InvalidSliceCount { nslice });
    }
    Ok(())
}

pub(crate) fn verify_ndir(ndir: usize) -> SirResult<()> {
    if ndir == 0 {
        return Err(SirError::InvalidDirectionCount { ndir });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify defaults resolve against the predictor dimension.
    //
    // Given
    // -----
    // - Default options and p ∈ {2, 10}.
    //
    // Expect
    // ------
    // - nslice = 8 for p = 2 and 13 for p = 10.
    // - ndir = 2 for p = 2 and 5 for p = 10.
    fn sir_options_defaults_resolve_against_dimension() {
        // Arrange
        let opts = SirOptions::default();

        // Act & Assert
        assert_eq!(opts.resolved_nslice(2), 8);
        assert_eq!(opts.resolved_nslice(10), 13);
        assert_eq!(opts.resolved_ndir(2), 2);
        assert_eq!(opts.resolved_ndir(10), 5);
        assert_eq!(opts.whitening, Whitening::Symmetric);
    }

    #[test]
    // Purpose
    // -------
    // Ensure out-of-range counts are rejected by the constructor.
    //
    // Given
    // -----
    // - nslice = 1 and ndir = 0.
    //
    // Expect
    // ------
    // - `InvalidSliceCount` and `InvalidDirectionCount` respectively.
    fn sir_options_new_rejects_invalid_counts() {
        // Act & Assert
        assert_eq!(
            SirOptions::new(Some(1), None, Whitening::Symmetric),
            Err(SirError::InvalidSliceCount { nslice: 1 })
        );
        assert_eq!(
            SirOptions::new(None, Some(0), Whitening::Orthogonal),
            Err(SirError::InvalidDirectionCount { ndir: 0 })
        );
        assert!(SirOptions::new(Some(4), Some(2), Whitening::Orthogonal).is_ok());
    }
}
