//! statistical_tests::dimension — sequential χ² tests for the SIR dimension.
//!
//! Purpose
//! -------
//! Decide how many leading SIR directions carry information. For each
//! candidate `k = 0, …, maxdim` the null hypothesis is that only the top `k`
//! eigenvalues of the kernel matrix are non-null.
//!
//! Key behaviors
//! -------------
//! - Statistic `Λₖ = n · Σ_{j ≥ k} λⱼ` (sum of the `p − k` smallest
//!   eigenvalues), computed as one reverse cumulative sum.
//! - Degrees of freedom `(p − k)(h − k − 1)`; upper-tail χ² p-values via
//!   `statrs`.
//! - `maxdim` defaults to and is clamped at `min(p − 1, h − 2)`, the largest
//!   `k` with positive degrees of freedom.
//!
//! Invariants & assumptions
//! ------------------------
//! - Eigenvalues are sorted in decreasing order and non-negative, as produced
//!   by `sir::fit::SirFit`.
//! - Every returned degree of freedom is strictly positive.
use crate::sir::{data::SirData, fit::SirFit};
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    method::TestMethod,
    mixture::chi_square_sf,
};
use ndarray::Array1;

/// DimensionTest — statistics for candidate dimensions `k = 0..=maxdim`.
///
/// Fields
/// ------
/// - `stats`: `Array1<f64>` — `Λₖ` per candidate.
/// - `dfs`: `Vec<usize>` — degrees of freedom per candidate.
/// - `p_values`: `Array1<f64>` — `P(χ²_{dfₖ} > Λₖ)`.
/// - `method`: [`TestMethod`] used.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionTest {
    pub stats: Array1<f64>,
    pub dfs: Vec<usize>,
    pub p_values: Array1<f64>,
    pub method: TestMethod,
}

impl DimensionTest {
    /// Run the dimension test on a fitted model.
    ///
    /// Parameters
    /// ----------
    /// - `data`, `fit`: the preprocessed input and the fit computed from it.
    /// - `maxdim`: `Option<usize>`
    ///   Largest candidate dimension; `None` uses `min(p − 1, h − 2)`.
    /// - `method`: [`TestMethod`]
    ///
    /// Errors
    /// ------
    /// - `TestError::NoTestableDimension` when `p < 1` or `h < 2`.
    pub fn from_fit(
        data: &SirData, fit: &SirFit, maxdim: Option<usize>, method: TestMethod,
    ) -> TestResult<Self> {
        Self::from_eigenvalues(fit.eigs(), data.nobs(), data.nslice(), maxdim, method)
    }

    /// Run the dimension test from decreasing eigenvalues, the sample size,
    /// and the realized slice count.
    pub fn from_eigenvalues(
        eigs: &Array1<f64>, nobs: usize, nslice: usize, maxdim: Option<usize>,
        method: TestMethod,
    ) -> TestResult<Self> {
        let p = eigs.len();
        let bound = max_testable_dimension(p, nslice)?;
        let maxdim = match maxdim {
            Some(requested) if requested > bound => {
                log::debug!("dimension test maxdim {requested} clamped to {bound}");
                bound
            }
            Some(requested) => requested,
            None => bound,
        };

        match method {
            TestMethod::ChiSquare => {
                let mut tail_sums = vec![0.0; p];
                let mut running = 0.0;
                for j in (0..p).rev() {
                    running += eigs[j];
                    tail_sums[j] = running;
                }

                let n = nobs as f64;
                let stats: Array1<f64> = (0..=maxdim).map(|k| n * tail_sums[k]).collect();
                let dfs: Vec<usize> = (0..=maxdim).map(|k| (p - k) * (nslice - k - 1)).collect();
                let p_values = stats
                    .iter()
                    .zip(&dfs)
                    .map(|(&stat, &df)| chi_square_sf(stat, df as f64))
                    .collect::<TestResult<Array1<f64>>>()?;
                Ok(DimensionTest { stats, dfs, p_values, method })
            }
        }
    }

    /// Smallest `k` whose null is not rejected at `level`, if any.
    pub fn estimated_dimension(&self, level: f64) -> Option<usize> {
        self.p_values.iter().position(|&pv| pv > level)
    }
}

/// Largest candidate `k` with positive degrees of freedom: `min(p − 1, h − 2)`.
pub fn max_testable_dimension(p: usize, nslice: usize) -> TestResult<usize> {
    if p < 1 || nslice < 2 {
        return Err(TestError::NoTestableDimension { p, nslice });
    }
    Ok((p - 1).min(nslice - 2))
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
    // - Statistics and degrees of freedom on hand-computable eigenvalues.
    // - Clamping of `maxdim` and the default bound.
    // - The single-predictor case and the no-testable-dimension error.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify statistics, degrees of freedom, and p-values.
    //
    // Given
    // -----
    // - eigs = [0.5, 0.1, 0.01], n = 100, h = 5, default maxdim.
    //
    // Expect
    // ------
    // - maxdim = min(2, 3) = 2; stats [61, 11, 1]; dfs [12, 6, 2].
    // - p-values are χ² upper tails and increase along k here.
    fn dimension_test_matches_hand_computation() {
        // Arrange
        let eigs = array![0.5, 0.1, 0.01];

        // Act
        let test = DimensionTest::from_eigenvalues(&eigs, 100, 5, None, TestMethod::ChiSquare)
            .unwrap();

        // Assert
        assert_eq!(test.dfs, vec![12, 6, 2]);
        for (got, want) in test.stats.iter().zip([61.0, 11.0, 1.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(test.p_values[2], (-0.5_f64).exp(), epsilon = 1e-10);
        assert!(test.p_values[0] < 1e-6);
        assert!(test.p_values[0] < test.p_values[1] && test.p_values[1] < test.p_values[2]);
        assert_eq!(test.estimated_dimension(0.05), Some(1));
    }

    #[test]
    // Purpose
    // -------
    // Ensure `maxdim` is clamped and small designs are handled.
    //
    // Given
    // -----
    // - eigs of length 3 with maxdim = 10 and h = 5.
    // - eigs of length 3 with h = 2; eigs of length 1 with h = 4.
    // - h = 1.
    //
    // Expect
    // ------
    // - Three candidates after clamping; one candidate with df 3 in both
    //   small cases; `NoTestableDimension` for h = 1.
    fn dimension_test_clamps_maxdim_and_rejects_degenerate_designs() {
        // Arrange
        let eigs = array![0.5, 0.1, 0.01];

        // Act
        let clamped =
            DimensionTest::from_eigenvalues(&eigs, 50, 5, Some(10), TestMethod::ChiSquare).unwrap();
        let two_slices =
            DimensionTest::from_eigenvalues(&eigs, 50, 2, None, TestMethod::ChiSquare).unwrap();
        let single =
            DimensionTest::from_eigenvalues(&array![0.9], 8, 4, None, TestMethod::ChiSquare)
                .unwrap();
        let degenerate = DimensionTest::from_eigenvalues(&eigs, 50, 1, None, TestMethod::ChiSquare);

        // Assert
        assert_eq!(clamped.stats.len(), 3);
        assert_eq!(two_slices.dfs, vec![3]);
        assert_eq!(single.dfs, vec![3]);
        assert_abs_diff_eq!(single.stats[0], 7.2, epsilon = 1e-12);
        assert_eq!(degenerate, Err(TestError::NoTestableDimension { p: 3, nslice: 1 }));
        assert!(clamped.dfs.iter().all(|&df| df > 0));
    }
}
