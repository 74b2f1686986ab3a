//! linalg::bridge — moving matrices between `ndarray` and `nalgebra`.
//!
//! Purpose
//! -------
//! The public surface of the crate speaks `ndarray` (`Array2`, `ArrayView2`),
//! while the decompositions (QR, symmetric eigen, inverse) come from
//! `nalgebra`. This module is the single crossing point: it copies matrices in
//! both directions and wraps the symmetric eigendecomposition so callers always
//! receive eigenpairs ordered by **decreasing** eigenvalue.
//!
//! Invariants & assumptions
//! ------------------------
//! - Copies preserve every entry exactly; no symmetrization happens unless a
//!   caller asks for it through [`symmetrize`] or [`descending_eigen`].
//! - [`descending_eigen`] uses a stable sort, so ties keep nalgebra's order and
//!   the output is reproducible bit for bit on identical inputs.
//!
//! Testing notes
//! -------------
//! - Unit tests cover exact copying, eigen ordering, and the
//!   reconstruction `V diag(λ) Vᵀ = S` on a small symmetric matrix.
use crate::linalg::errors::{LinalgError, LinalgResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2};

/// Copy an `ndarray` view into a column-major `DMatrix`.
pub fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy a `DMatrix` back into an owned `Array2`.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Return `(S + Sᵀ) / 2`.
pub fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    (m + m.transpose()) * 0.5
}

/// Reject empty or non-finite matrices.
///
/// Errors
/// ------
/// - `LinalgError::EmptyMatrix` when either dimension is zero.
/// - `LinalgError::NonFinite` for the first NaN or ±∞ entry in row-major order.
pub fn ensure_finite(a: ArrayView2<'_, f64>) -> LinalgResult<()> {
    if a.nrows() == 0 || a.ncols() == 0 {
        return Err(LinalgError::EmptyMatrix);
    }
    for ((row, col), &value) in a.indexed_iter() {
        if !value.is_finite() {
            return Err(LinalgError::NonFinite { row, col, value });
        }
    }
    Ok(())
}

/// descending_eigen — symmetric eigendecomposition sorted by decreasing eigenvalue.
///
/// Parameters
/// ----------
/// - `s`: `ArrayView2<f64>`
///   Square matrix, symmetric up to rounding. It is symmetrized before the
///   decomposition so that asymmetric rounding noise cannot leak into the
///   eigenvectors.
///
/// Returns
/// -------
/// `LinalgResult<(Array1<f64>, Array2<f64>)>`
///   Eigenvalues `λ₀ ≥ λ₁ ≥ … ≥ λ_{p−1}` and the matching orthonormal
///   eigenvectors as columns.
///
/// Errors
/// ------
/// - `LinalgError::NotSquare` when `s` is not square.
/// - Errors from [`ensure_finite`].
pub fn descending_eigen(s: ArrayView2<'_, f64>) -> LinalgResult<(Array1<f64>, Array2<f64>)> {
    if s.nrows() != s.ncols() {
        return Err(LinalgError::NotSquare { rows: s.nrows(), cols: s.ncols() });
    }
    ensure_finite(s)?;

    let p = s.nrows();
    let eig = symmetrize(&to_dmatrix(s)).symmetric_eigen();
    let mut order: Vec<usize> = (0..p).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

    let values = Array1::from_iter(order.iter().map(|&k| eig.eigenvalues[k]));
    let vectors = Array2::from_shape_fn((p, p), |(i, j)| eig.eigenvectors[(i, order[j])]);
    Ok((values, vectors))
}
