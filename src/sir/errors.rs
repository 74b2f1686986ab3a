//! sir::errors — error types for SIR construction and fitting.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by the sliced inverse
//! regression pipeline: input validation at construction, option checks, and
//! numerical failures raised while whitening or decomposing the kernel matrix.
//!
//! Key behaviors
//! -------------
//! - Define [`SirError`] and [`SirResult`] as the canonical error and result
//!   types for the `sir` subtree.
//! - Wrap [`LinalgError`] through `From` so `?` propagates numerical failures
//!   from `linalg` without losing their payload.
//!
//! Conventions
//! -----------
//! - Precondition violations (unsorted response, shape mismatch, non-finite
//!   values) are fatal and reported before any state is built.
//! - Soft limits (too many requested directions) are not errors; they are
//!   clamped and reported as `FitDiagnostic` values by `sir::fit`.
//! - Indices in payloads are 0-based.
use crate::linalg::LinalgError;

pub type SirResult<T> = Result<T, SirError>;

/// SirError — failure conditions for SIR construction and fitting.
///
/// Variants
/// --------
/// - `EmptyResponse`
///   The response has no observations.
/// - `LengthMismatch { n_y, n_x }`
///   `y.len()` differs from the number of predictor rows.
/// - `NonFiniteResponse { index, value }` / `NonFinitePredictor { row, col, value }`
///   A NaN or ±∞ entry in the response or predictors.
/// - `UnsortedResponse { index, previous, current }`
///   `y[index] < y[index − 1]`; the response must be pre-sorted ascending.
/// - `TooFewObservations { n, p }`
///   Centered predictors need `n > p` rows to have full column rank.
/// - `InvalidSliceCount { nslice }` / `InvalidDirectionCount { ndir }`
///   Option values outside their admissible ranges.
/// - `KernelNotPositiveSemiDefinite { index, eigenvalue }`
///   The kernel matrix has a clearly negative eigenvalue.
/// - `Numerical(LinalgError)`
///   Failure inside centering, whitening, or an eigendecomposition.
#[derive(Debug, Clone, PartialEq)]
pub enum SirError {
    // ---- Input validation ----
    EmptyResponse,
    LengthMismatch { n_y: usize, n_x: usize },
    NonFiniteResponse { index: usize, value: f64 },
    NonFinitePredictor { row: usize, col: usize, value: f64 },
    UnsortedResponse { index: usize, previous: f64, current: f64 },
    TooFewObservations { n: usize, p: usize },

    // ---- Options ----
    InvalidSliceCount { nslice: usize },
    InvalidDirectionCount { ndir: usize },

    // ---- Numerical ----
    KernelNotPositiveSemiDefinite { index: usize, eigenvalue: f64 },
    Numerical(LinalgError),
}

impl From<LinalgError> for SirError {
    fn from(err: LinalgError) -> Self {
        SirError::Numerical(err)
    }
}

impl std::error::Error for SirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SirError::Numerical(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for SirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            SirError::EmptyResponse => write!(f, "SIR Error: response has no observations"),
            SirError::LengthMismatch { n_y, n_x } => write!(
                f,
                "SIR Error: response length {n_y} does not match predictor rows {n_x}"
            ),
            SirError::NonFiniteResponse { index, value } => {
                write!(f, "SIR Error: response value {value} at index {index} is not finite")
            }
            SirError::NonFinitePredictor { row, col, value } => write!(
                f,
                "SIR Error: predictor value {value} at ({row}, {col}) is not finite"
            ),
            SirError::UnsortedResponse { index, previous, current } => write!(
                f,
                "SIR Error: response must be sorted in ascending order; y[{index}] = {current} \
                 follows {previous}. Sort y and permute the rows of X to match before fitting"
            ),
            SirError::TooFewObservations { n, p } => write!(
                f,
                "SIR Error: {n} observations cannot support {p} predictors (need n > p)"
            ),

            // ---- Options ----
            SirError::InvalidSliceCount { nslice } => {
                write!(f, "SIR Error: invalid slice count {nslice}; need at least 2 slices")
            }
            SirError::InvalidDirectionCount { ndir } => {
                write!(f, "SIR Error: invalid direction count {ndir}; need at least 1")
            }

            // ---- Numerical ----
            SirError::KernelNotPositiveSemiDefinite { index, eigenvalue } => write!(
                f,
                "SIR Error: kernel matrix is not positive semi-definite (eigenvalue {index} = \
                 {eigenvalue})"
            ),
            SirError::Numerical(err) => write!(f, "SIR Error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Descriptive `Display` output for the unsorted-response precondition.
    // - Wrapping of `LinalgError` and exposure through `source()`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the unsorted-response message tells the caller what to do.
    //
    // Given
    // -----
    // - `UnsortedResponse { index: 4, previous: 2.5, current: 1.0 }`.
    //
    // Expect
    // ------
    // - Message mentions sorting, the index, and both values.
    fn sir_error_unsorted_response_is_descriptive() {
        // Arrange
        let err = SirError::UnsortedResponse { index: 4, previous: 2.5, current: 1.0 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("sorted"), "unexpected message: {msg}");
        assert!(msg.contains("y[4]") && msg.contains("2.5"), "unexpected message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure `From<LinalgError>` wraps the numerical error and keeps it
    // reachable as the error source.
    //
    // Given
    // -----
    // - `LinalgError::RankDeficient { index: 1, eigenvalue: 0.0 }`.
    //
    // Expect
    // ------
    // - `SirError::Numerical` holding the same payload, with `source()` set.
    fn sir_error_from_linalg_error_preserves_source() {
        // Arrange
        let inner = LinalgError::RankDeficient { index: 1, eigenvalue: 0.0 };

        // Act
        let err: SirError = inner.clone().into();

        // Assert
        assert_eq!(err, SirError::Numerical(inner));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("rank deficient"));
    }
}
