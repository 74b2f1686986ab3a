//! sir::validation — input guards for SIR construction.
//!
//! Purpose
//! -------
//! Centralize the preconditions on `(y, X)` so that construction fails fast,
//! before centering or whitening allocate anything. A successful return is a
//! guarantee that `y` is non-empty, finite, sorted ascending, aligned
//! row-for-row with `X`, and that `X` is finite with more rows than columns.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise every error branch plus the happy path.
use crate::sir::errors::{SirError, SirResult};
use ndarray::ArrayView2;

/// Validate the response alone: non-empty, finite, and non-decreasing.
///
/// Errors
/// ------
/// - `SirError::EmptyResponse` when `y` is empty.
/// - `SirError::NonFiniteResponse` for the first NaN or ±∞.
/// - `SirError::UnsortedResponse` for the first descent `y[i] < y[i−1]`.
pub fn validate_response(y: &[f64]) -> SirResult<()> {
    if y.is_empty() {
        return Err(SirError::EmptyResponse);
    }
    for (index, &value) in y.iter().enumerate() {
        if !value.is_finite() {
            return Err(SirError::NonFiniteResponse { index, value });
        }
    }
    if let Some(index) = (1..y.len()).find(|&i| y[i] < y[i - 1]) {
        return Err(SirError::UnsortedResponse {
            index,
            previous: y[index - 1],
            current: y[index],
        });
    }
    Ok(())
}

/// Validate `(y, X)` jointly.
///
/// Parameters
/// ----------
/// - `y`: `&[f64]`
///   Response, sorted ascending by the caller.
/// - `x`: `ArrayView2<f64>`
///   `n×p` raw predictors aligned with `y`.
///
/// Errors
/// ------
/// - Everything [`validate_response`] reports.
/// - `SirError::LengthMismatch` when `y.len() != x.nrows()`.
/// - `SirError::NonFinitePredictor` for the first non-finite entry.
/// - `SirError::TooFewObservations` when `p == 0` or `n ≤ p`.
pub fn validate_inputs(y: &[f64], x: ArrayView2<'_, f64>) -> SirResult<()> {
    validate_response(y)?;
    let (n, p) = x.dim();
    if y.len() != n {
        return Err(SirError::LengthMismatch { n_y: y.len(), n_x: n });
    }
    for ((row, col), &value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(SirError::NonFinitePredictor { row, col, value });
        }
    }
    if p == 0 || n <= p {
        return Err(SirError::TooFewObservations { n, p });
    }
    Ok(())
}
