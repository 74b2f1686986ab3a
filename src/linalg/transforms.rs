//! linalg::transforms — centering, whitening, and symmetric inverse square roots.
//!
//! Purpose
//! -------
//! Provide the stateless numeric transforms shared by the SIR estimator and the
//! coordinate test. Every function takes an immutable view and returns freshly
//! allocated outputs; nothing here holds state between calls.
//!
//! Key behaviors
//! -------------
//! - [`center`] removes column means and returns them.
//! - [`sym_inv_sqrt`] computes `T = S^{-1/2}` for a symmetric positive-definite
//!   `S` through `S = V Λ Vᵀ`, `T = V Λ^{-1/2} Vᵀ`.
//! - [`whiten`] finds a transform `T` with `Z = X·T` and `ZᵀZ/n = I`, either
//!   symmetric (default) or from the triangular QR factor.
//! - [`orthonormalize`] and [`orthogonal_complement`] build orthonormal bases
//!   used to express hypotheses in whitened coordinates.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; [`whiten`] and [`sym_inv_sqrt`] check this and fail
//!   with [`LinalgError::NonFinite`] otherwise.
//! - Covariances use the `1/n` normalization: `RᵀR/n = XᵀX/n` for centered X.
//! - An eigenvalue `λ ≤ RANK_TOL · max|λ|` is treated as zero, which makes
//!   [`sym_inv_sqrt`] fail with [`LinalgError::RankDeficient`].
//!
//! Conventions
//! -----------
//! - Matrices are row-major `ndarray` arrays with observations in rows and
//!   variables in columns.
//! - The whitening transform is stored in the orientation `Z = X · T`, so a
//!   direction `b` found in whitened space corresponds to `T·b` in the
//!   original predictor space.
//!
//! Testing notes
//! -------------
//! - Unit tests check `ZᵀZ/n ≈ I` under both policies, symmetry of the
//!   symmetric transform, the round trip through [`Whitened::inverse_transform`],
//!   and the failure path on collinear predictors.
use crate::linalg::{
    bridge::{descending_eigen, ensure_finite, to_array2, to_dmatrix},
    errors::{LinalgError, LinalgResult},
};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Relative threshold below which an eigenvalue or triangular pivot is zero.
pub const RANK_TOL: f64 = 1e-10;

/// Whitening policy used by [`whiten`].
///
/// - `Symmetric`: `T = (RᵀR/n)^{-1/2}`, a symmetric matrix. Coordinate tests
///   rely on this choice being basis independent.
/// - `Orthogonal`: `T = (R/√n)^{-1}`, so that `Z = Q·√n`. Cheaper, but `T` is
///   upper triangular rather than symmetric. The stored `trans` is the
///   *inverse* of the scaled triangular factor `R/√n`, not the factor itself:
///   `Z = X · trans` replaces the left-division `X / (R/√n)`, and
///   [`Whitened::inverse_transform`] recovers `R/√n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whitening {
    #[default]
    Symmetric,
    Orthogonal,
}

/// Whitened predictors together with the transform that produced them.
///
/// Fields
/// ------
/// - `z`: `Array2<f64>`
///   `n×p` whitened data with `ZᵀZ/n ≈ I`.
/// - `trans`: `Array2<f64>`
///   `p×p` transform with `Z = X · trans`.
#[derive(Debug, Clone, PartialEq)]
pub struct Whitened {
    pub z: Array2<f64>,
    pub trans: Array2<f64>,
}

impl Whitened {
    /// Inverse of `trans`, mapping whitened rows back to centered predictors
    /// (`X = Z · trans⁻¹`).
    ///
    /// Errors
    /// ------
    /// - `LinalgError::SingularFactor` if `trans` cannot be inverted, which
    ///   cannot happen for a transform returned by [`whiten`] unless it was
    ///   modified afterwards.
    pub fn inverse_transform(&self) -> LinalgResult<Array2<f64>> {
        let inv = to_dmatrix(self.trans.view())
            .try_inverse()
            .ok_or(LinalgError::SingularFactor { index: 0, value: 0.0 })?;
        Ok(to_array2(&inv))
    }
}

/// center — subtract per-column means.
///
/// Returns
/// -------
/// `(Array2<f64>, Array1<f64>)`
///   The centered matrix and the vector of removed means. A matrix with zero
///   rows yields an unchanged (empty) matrix and a zero mean vector.
pub fn center(x: ArrayView2<'_, f64>) -> (Array2<f64>, Array1<f64>) {
    let means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(x.ncols()));
    let centered = &x - &means;
    (centered, means)
}

/// sym_inv_sqrt — inverse symmetric square root of an SPD matrix.
///
/// Parameters
/// ----------
/// - `s`: `ArrayView2<f64>`
///   Symmetric positive-definite `p×p` matrix.
///
/// Returns
/// -------
/// `LinalgResult<Array2<f64>>`
///   Symmetric `T` with `T·T = S⁻¹`.
///
/// Errors
/// ------
/// - `LinalgError::NotSquare`, `EmptyMatrix`, `NonFinite` for malformed input.
/// - `LinalgError::RankDeficient { index, eigenvalue }` for the first
///   eigenvalue (in decreasing order) that is not safely positive.
///
/// Notes
/// -----
/// - The zero threshold is relative: `RANK_TOL · max|λ|`. A zero matrix is
///   rank deficient at index 0.
pub fn sym_inv_sqrt(s: ArrayView2<'_, f64>) -> LinalgResult<Array2<f64>> {
    let (values, vectors) = descending_eigen(s)?;
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = RANK_TOL * scale;
    if let Some((index, &eigenvalue)) = values.iter().enumerate().find(|(_, v)| **v <= cutoff) {
        return Err(LinalgError::RankDeficient { index, eigenvalue });
    }

    let inv_sqrt = values.mapv(|v| 1.0 / v.sqrt());
    let scaled = &vectors * &inv_sqrt;
    Ok(scaled.dot(&vectors.t()))
}

/// whiten — decorrelating transform for centered predictors.
///
/// Parameters
/// ----------
/// - `x`: `ArrayView2<f64>`
///   Centered `n×p` predictors with `n ≥ p` and full column rank.
/// - `mode`: [`Whitening`]
///   Symmetric (default) or orthogonal policy.
///
/// Returns
/// -------
/// `LinalgResult<Whitened>`
///   `Z = X · trans` with `ZᵀZ/n ≈ I`.
///
/// Errors
/// ------
/// - `LinalgError::TooFewRows` when `n < p`.
/// - `LinalgError::RankDeficient` (symmetric) or `SingularFactor`
///   (orthogonal) when X does not have full column rank.
/// - `EmptyMatrix` / `NonFinite` from input checks.
///
/// Notes
/// -----
/// - Both policies start from the thin QR factorization `X = QR` and scale the
///   triangular factor by `1/√n`, so that `RᵀR` is the `1/n` covariance.
pub fn whiten(x: ArrayView2<'_, f64>, mode: Whitening) -> LinalgResult<Whitened> {
    ensure_finite(x)?;
    let (n, p) = x.dim();
    if n < p {
        return Err(LinalgError::TooFewRows { rows: n, cols: p });
    }

    let r = to_dmatrix(x).qr().r() / (n as f64).sqrt();
    let trans = match mode {
        Whitening::Symmetric => {
            let cov = to_array2(&(r.transpose() * &r));
            sym_inv_sqrt(cov.view())?
        }
        Whitening::Orthogonal => {
            let scale = (0..p).fold(0.0_f64, |acc, i| acc.max(r[(i, i)].abs()));
            if let Some(index) = (0..p).find(|&i| r[(i, i)].abs() <= RANK_TOL * scale) {
                return Err(LinalgError::SingularFactor { index, value: r[(index, index)] });
            }
            let inv = r
                .clone()
                .try_inverse()
                .ok_or(LinalgError::SingularFactor { index: 0, value: r[(0, 0)] })?;
            to_array2(&inv)
        }
    };

    let z = x.dot(&trans);
    Ok(Whitened { z, trans })
}

/// Orthonormalize the columns of `a`: returns `a (aᵀa)^{-1/2}`.
///
/// Fails with `RankDeficient` if the columns of `a` are linearly dependent.
pub fn orthonormalize(a: ArrayView2<'_, f64>) -> LinalgResult<Array2<f64>> {
    let gram = a.t().dot(&a);
    let root = sym_inv_sqrt(gram.view())?;
    Ok(a.dot(&root))
}

/// orthogonal_complement — orthonormal basis of `span(h)^⊥` in ℝᵖ.
///
/// Parameters
/// ----------
/// - `h`: `ArrayView2<f64>`
///   `p×k` matrix with linearly independent columns.
///
/// Returns
/// -------
/// `LinalgResult<Array2<f64>>`
///   `p×(p−k)` matrix with orthonormal columns, each orthogonal to every
///   column of `h`. When `k = p` the result has zero columns.
///
/// Notes
/// -----
/// - Built from the eigenvectors of `I − UUᵀ` (`U` = orthonormalized `h`)
///   whose eigenvalues are one; the projector's eigenvalues are exactly 0 or 1
///   up to rounding, so the 0.5 split is unambiguous.
pub fn orthogonal_complement(h: ArrayView2<'_, f64>) -> LinalgResult<Array2<f64>> {
    let p = h.nrows();
    let u = orthonormalize(h)?;
    let projector = Array2::<f64>::eye(p) - u.dot(&u.t());
    let (values, vectors) = descending_eigen(projector.view())?;
    let keep = values.iter().take_while(|&&v| v > 0.5).count();
    Ok(vectors.slice(ndarray::s![.., ..keep]).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column centering.
    // - `sym_inv_sqrt` on SPD and singular matrices.
    // - Whitening identities for both policies, including Z = X·T and the
    //   inverse-transform round trip.
    // - Orthogonal complements.
    //
    // They intentionally DO NOT cover:
    // - Behavior inside the SIR pipeline; see `sir::data`.
    // -------------------------------------------------------------------------

    fn sample_predictors() -> Array2<f64> {
        array![
            [1.0, 2.0, 0.5],
            [2.0, 1.0, -1.0],
            [0.0, 3.0, 2.0],
            [4.0, -1.0, 0.0],
            [3.0, 0.5, 1.5],
            [-1.0, 2.5, -0.5],
            [2.5, 2.0, 3.0],
        ]
    }

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>, eps: f64) {
        assert_eq!(a.dim(), b.dim());
        for ((i, j), &v) in a.indexed_iter() {
            assert_abs_diff_eq!(v, b[[i, j]], epsilon = eps);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `center` removes column means and returns them.
    //
    // Given
    // -----
    // - A 3×2 matrix with column means (2, 20).
    //
    // Expect
    // ------
    // - Returned means equal (2, 20) and centered columns sum to zero.
    fn center_removes_column_means() {
        // Arrange
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];

        // Act
        let (xc, means) = center(x.view());

        // Assert
        assert_eq!(means, array![2.0, 20.0]);
        assert_eq!(xc.column(0).to_vec(), vec![-1.0, 0.0, 1.0]);
        assert_abs_diff_eq!(xc.column(1).sum(), 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check that `sym_inv_sqrt` returns a symmetric T with T·T·S = I.
    //
    // Given
    // -----
    // - S = [[4, 1], [1, 3]], symmetric positive definite.
    //
    // Expect
    // ------
    // - T is symmetric and T·T·S ≈ I.
    fn sym_inv_sqrt_squares_to_inverse() {
        // Arrange
        let s = array![[4.0, 1.0], [1.0, 3.0]];

        // Act
        let t = sym_inv_sqrt(s.view()).expect("SPD input");

        // Assert
        assert_abs_diff_eq!(t[[0, 1]], t[[1, 0]], epsilon = 1e-14);
        assert_close(&t.dot(&t).dot(&s), &Array2::eye(2), 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a singular matrix is reported as rank deficient.
    //
    // Given
    // -----
    // - S = [[1, 1], [1, 1]], rank one.
    //
    // Expect
    // ------
    // - `LinalgError::RankDeficient` at index 1.
    fn sym_inv_sqrt_singular_matrix_is_rank_deficient() {
        // Arrange
        let s = array![[1.0, 1.0], [1.0, 1.0]];

        // Act
        let result = sym_inv_sqrt(s.view());

        // Assert
        match result {
            Err(LinalgError::RankDeficient { index: 1, .. }) => (),
            other => panic!("expected RankDeficient at index 1, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the whitening identities under both policies.
    //
    // Given
    // -----
    // - A centered 7×3 predictor matrix of full column rank.
    //
    // Expect
    // ------
    // - ZᵀZ/n ≈ I and Z = X·trans for both policies.
    // - The symmetric transform is symmetric.
    fn whiten_produces_identity_covariance_for_both_policies() {
        // Arrange
        let (xc, _) = center(sample_predictors().view());
        let n = xc.nrows() as f64;

        for mode in [Whitening::Symmetric, Whitening::Orthogonal] {
            // Act
            let w = whiten(xc.view(), mode).expect("full-rank predictors whiten");

            // Assert
            let cov = w.z.t().dot(&w.z) / n;
            assert_close(&cov, &Array2::eye(3), 1e-10);
            assert_close(&w.z, &xc.dot(&w.trans), 0.0);
            if mode == Whitening::Symmetric {
                assert_close(&w.trans, &w.trans.t().to_owned(), 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the round trip X → Z → X through the inverse transform.
    //
    // Given
    // -----
    // - Centered sample predictors whitened symmetrically.
    //
    // Expect
    // ------
    // - Z · trans⁻¹ reproduces the centered predictors.
    fn whiten_inverse_transform_round_trips() {
        // Arrange
        let (xc, _) = center(sample_predictors().view());
        let w = whiten(xc.view(), Whitening::Symmetric).expect("full-rank predictors whiten");

        // Act
        let inv = w.inverse_transform().expect("whitening transform is invertible");

        // Assert
        assert_close(&w.z.dot(&inv), &xc, 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Pin down what `trans` holds under the orthogonal policy.
    //
    // Given
    // -----
    // - Centered sample predictors whitened with `Whitening::Orthogonal`.
    //
    // Expect
    // ------
    // - `trans` is upper triangular.
    // - Its inverse is the scaled triangular factor: upper triangular with
    //   `(R/√n)ᵀ(R/√n) = XᵀX/n`.
    fn whiten_orthogonal_stores_inverse_of_scaled_factor() {
        // Arrange
        let (xc, _) = center(sample_predictors().view());
        let n = xc.nrows() as f64;

        // Act
        let w = whiten(xc.view(), Whitening::Orthogonal).expect("full-rank predictors whiten");
        let factor = w.inverse_transform().expect("triangular transform is invertible");

        // Assert
        for ((i, j), &v) in w.trans.indexed_iter() {
            if i > j {
                assert!(v.abs() < 1e-12, "trans[{i}, {j}] = {v}");
            }
        }
        for ((i, j), &v) in factor.indexed_iter() {
            if i > j {
                assert!(v.abs() < 1e-12, "factor[{i}, {j}] = {v}");
            }
        }
        assert_close(&factor.t().dot(&factor), &(xc.t().dot(&xc) / n), 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure collinear predictors and short matrices are rejected.
    //
    // Given
    // -----
    // - A 4×2 matrix whose second column is twice the first.
    // - A 2×3 matrix (fewer rows than columns).
    //
    // Expect
    // ------
    // - `RankDeficient` (symmetric) / `SingularFactor` (orthogonal).
    // - `TooFewRows` for the short matrix.
    fn whiten_rejects_collinear_and_short_inputs() {
        // Arrange
        let (collinear, _) =
            center(array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [5.0, 10.0]].view());
        let short = Array2::<f64>::ones((2, 3));

        // Act & Assert
        match whiten(collinear.view(), Whitening::Symmetric) {
            Err(LinalgError::RankDeficient { .. }) => (),
            other => panic!("expected RankDeficient, got {other:?}"),
        }
        match whiten(collinear.view(), Whitening::Orthogonal) {
            Err(LinalgError::SingularFactor { index: 1, .. }) => (),
            other => panic!("expected SingularFactor at 1, got {other:?}"),
        }
        assert_eq!(
            whiten(short.view(), Whitening::Symmetric),
            Err(LinalgError::TooFewRows { rows: 2, cols: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify `orthogonal_complement` returns an orthonormal basis
    // orthogonal to the input span.
    //
    // Given
    // -----
    // - A single direction h = (1, 1, 0) in ℝ³.
    //
    // Expect
    // ------
    // - Two orthonormal columns, each orthogonal to h.
    fn orthogonal_complement_is_orthonormal_and_orthogonal() {
        // Arrange
        let h = array![[1.0], [1.0], [0.0]];

        // Act
        let c = orthogonal_complement(h.view()).expect("independent columns");

        // Assert
        assert_eq!(c.dim(), (3, 2));
        assert_close(&c.t().dot(&c), &Array2::eye(2), 1e-12);
        for v in h.t().dot(&c).iter() {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
        }
    }
}
