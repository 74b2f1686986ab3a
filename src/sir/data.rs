//! sir::data — validated, preprocessed input for sliced inverse regression.
//!
//! Purpose
//! -------
//! Hold everything SIR derives from `(y, X)` before any eigen-analysis:
//! centered predictors, whitened predictors and their transform, slice
//! boundaries, slice labels, occupancy weights, and slice means. All of it is
//! computed eagerly by [`SirData::new`] and never changes afterwards, so a
//! fitted result (`sir::fit::SirFit`) can be recomputed from it for any number
//! of directions without repeating the preprocessing.
//!
//! Key behaviors
//! -------------
//! - Validate inputs (sorted, finite, aligned, `n > p`) before allocating.
//! - Center `X`, whiten it under the chosen [`Whitening`] policy, slice the
//!   response, and compute slice means of the whitened data.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y` is non-decreasing; `x` is stored centered with `x_mean` removed.
//! - `z = x · trans` and `zᵀz/n ≈ I`.
//! - `bd` is strictly increasing from `0` to `n`; `nslice = bd.len() − 1`.
//! - `fw` sums to one; `sm` is `p × nslice`.
//!
//! Downstream usage
//! ----------------
//! - `sir::fit` reads `sm`, `fw`, and `trans`.
//! - `statistical_tests::dimension` reads `nobs` and `nslice`.
//! - `statistical_tests::coordinate` reads the centered predictors, `bd`, `fw`.
use crate::linalg::{Whitening, center, whiten};
use crate::sir::{
    errors::SirResult,
    options::verify_nslice,
    slice_means::slice_means,
    slicing::{slice_assignments, slicer},
    validation::validate_inputs,
};
use ndarray::{Array1, Array2, ArrayView2};

/// SirData — immutable preprocessed SIR input.
///
/// Fields
/// ------
/// - `y`: `Array1<f64>` — sorted response.
/// - `x`: `Array2<f64>` — centered predictors, `n×p`.
/// - `x_mean`: `Array1<f64>` — column means removed from the raw predictors.
/// - `z`: `Array2<f64>` — whitened predictors, `n×p`.
/// - `trans`: `Array2<f64>` — `p×p` whitening transform, `z = x · trans`.
/// - `whitening`: [`Whitening`] — policy that produced `trans`.
/// - `bd`: `Vec<usize>` — slice boundaries (0-based, half-open).
/// - `slice_assignments`: `Vec<usize>` — slice label per observation.
/// - `fw`: `Array1<f64>` — slice occupancy fractions.
/// - `sm`: `Array2<f64>` — slice means of `z` as columns, `p×h`.
/// - `nslice`: `usize` — realized slice count (`≤` the request).
#[derive(Debug, Clone, PartialEq)]
pub struct SirData {
    y: Array1<f64>,
    x: Array2<f64>,
    x_mean: Array1<f64>,
    z: Array2<f64>,
    trans: Array2<f64>,
    whitening: Whitening,
    bd: Vec<usize>,
    slice_assignments: Vec<usize>,
    fw: Array1<f64>,
    sm: Array2<f64>,
    nslice: usize,
}

impl SirData {
    /// Preprocess `(y, X)` for SIR.
    ///
    /// Parameters
    /// ----------
    /// - `y`: `&[f64]`
    ///   Response sorted ascending; ties are allowed.
    /// - `x`: `ArrayView2<f64>`
    ///   `n×p` raw predictors, row `i` aligned with `y[i]`.
    /// - `nslice`: `usize`
    ///   Requested slice count (≥ 2). The realized count can be smaller when
    ///   the response has heavy ties.
    /// - `whitening`: [`Whitening`]
    ///   Whitening policy.
    ///
    /// Returns
    /// -------
    /// `SirResult<SirData>`
    ///
    /// Errors
    /// ------
    /// - Validation errors from `sir::validation::validate_inputs`
    ///   (`UnsortedResponse`, `LengthMismatch`, non-finite values,
    ///   `TooFewObservations`).
    /// - `SirError::InvalidSliceCount` when `nslice < 2`.
    /// - `SirError::Numerical` when the predictors are rank deficient.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_sdr::linalg::Whitening;
    /// # use rust_sdr::sir::data::SirData;
    /// let y = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0];
    /// let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
    /// let data = SirData::new(&y, x.view(), 4, Whitening::Symmetric).unwrap();
    /// assert_eq!(data.bd(), &[0, 2, 4, 6, 8]);
    /// assert_eq!(data.nslice(), 4);
    /// ```
    pub fn new(
        y: &[f64], x: ArrayView2<'_, f64>, nslice: usize, whitening: Whitening,
    ) -> SirResult<Self> {
        validate_inputs(y, x)?;
        verify_nslice(nslice)?;

        let (x_centered, x_mean) = center(x);
        let whitened = whiten(x_centered.view(), whitening)?;
        let bd = slicer(y, nslice)?;
        let (sm, fw) = slice_means(whitened.z.view(), &bd);

        Ok(SirData {
            y: Array1::from(y.to_vec()),
            x: x_centered,
            x_mean,
            z: whitened.z,
            trans: whitened.trans,
            whitening,
            slice_assignments: slice_assignments(&bd),
            nslice: bd.len() - 1,
            bd,
            fw,
            sm,
        })
    }

    /// Number of observations `n`.
    pub fn nobs(&self) -> usize {
        self.y.len()
    }

    /// Number of predictors `p`.
    pub fn npred(&self) -> usize {
        self.x.ncols()
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    /// Centered predictors.
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn x_mean(&self) -> &Array1<f64> {
        &self.x_mean
    }

    /// Whitened predictors.
    pub fn z(&self) -> &Array2<f64> {
        &self.z
    }

    /// Whitening transform with `z = x · trans`.
    pub fn trans(&self) -> &Array2<f64> {
        &self.trans
    }

    pub fn whitening(&self) -> Whitening {
        self.whitening
    }

    /// Slice boundaries.
    pub fn bd(&self) -> &[usize] {
        &self.bd
    }

    pub fn slice_assignments(&self) -> &[usize] {
        &self.slice_assignments
    }

    /// Slice occupancy fractions.
    pub fn fw(&self) -> &Array1<f64> {
        &self.fw
    }

    /// Slice means of the whitened predictors (`p×h`).
    pub fn sm(&self) -> &Array2<f64> {
        &self.sm
    }

    /// Realized slice count.
    pub fn nslice(&self) -> usize {
        self.nslice
    }
}
