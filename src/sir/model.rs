//! sir::model — the user-facing SIR estimator.
//!
//! Purpose
//! -------
//! Bundle the preprocessed input ([`SirData`]) with its fit ([`SirFit`]) and
//! expose the operations a caller needs: fitting from raw arrays, the
//! estimated directions, refitting with a different number of directions,
//! projecting new predictors, and the dimension and coordinate tests.
//!
//! Key behaviors
//! -------------
//! - [`SlicedInverseRegression::fit`] resolves unset options against the
//!   predictor dimension (`max(8, p + 3)` slices, `min(5, p)` directions).
//! - The model is immutable; [`SlicedInverseRegression::refit`] returns a new
//!   model that shares the preprocessing result.
//! - Tests never mutate the model.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y` must be sorted ascending by the caller with the rows of `X` permuted
//!   to match; an unsorted response is rejected with
//!   `SirError::UnsortedResponse`.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! # use ndarray::array;
//! # use rust_sdr::sir::{SirOptions, SlicedInverseRegression};
//! let y = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0];
//! let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
//! let opts = SirOptions { nslice: Some(4), ..Default::default() };
//! let model = SlicedInverseRegression::fit(x.view(), &y, &opts)?;
//! assert_eq!(model.coef().dim(), (1, 1));
//! # Ok::<(), rust_sdr::sir::SirError>(())
//! ```
use crate::linalg::{LinalgError, Whitening};
use crate::sir::{
    data::SirData,
    errors::{SirError, SirResult},
    fit::{FitDiagnostic, SirFit},
    options::{SirOptions, default_ndir},
};
use crate::statistical_tests::{
    coordinate::{CoordinateHypothesis, CoordinateTest, CoordinateTestOptions},
    dimension::DimensionTest,
    errors::TestResult,
    method::TestMethod,
};
use ndarray::{Array2, ArrayView2};

/// SlicedInverseRegression — fitted SIR model.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicedInverseRegression {
    data: SirData,
    fit: SirFit,
}

impl SlicedInverseRegression {
    /// Fit SIR to raw predictors and a sorted response.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `ArrayView2<f64>` — `n×p` predictors, rows aligned with `y`.
    /// - `y`: `&[f64]` — response sorted ascending.
    /// - `opts`: [`SirOptions`] — slice and direction counts, whitening.
    ///
    /// Errors
    /// ------
    /// - Any [`SirError`] from preprocessing or fitting.
    pub fn fit(x: ArrayView2<'_, f64>, y: &[f64], opts: &SirOptions) -> SirResult<Self> {
        let p = x.ncols();
        let data = SirData::new(y, x, opts.resolved_nslice(p), opts.whitening)?;
        let fit = SirFit::new(&data, opts.resolved_ndir(p))?;
        Ok(SlicedInverseRegression { data, fit })
    }

    /// Preprocess with an explicit slice count and fit `min(5, p)` directions.
    pub fn new(
        y: &[f64], x: ArrayView2<'_, f64>, nslice: usize, whitening: Whitening,
    ) -> SirResult<Self> {
        let data = SirData::new(y, x, nslice, whitening)?;
        let fit = SirFit::new(&data, default_ndir(data.npred()))?;
        Ok(SlicedInverseRegression { data, fit })
    }

    /// Fit `ndir` directions on already preprocessed data.
    pub fn from_data(data: SirData, ndir: usize) -> SirResult<Self> {
        let fit = SirFit::new(&data, ndir)?;
        Ok(SlicedInverseRegression { data, fit })
    }

    /// Same model with `ndir` directions; slicing and the kernel are reused.
    pub fn refit(&self, ndir: usize) -> SirResult<Self> {
        let fit = self.fit.with_directions(&self.data, ndir)?;
        Ok(SlicedInverseRegression { data: self.data.clone(), fit })
    }

    /// Estimated EDR directions (`p×ndir`, unit-norm columns).
    pub fn coef(&self) -> &Array2<f64> {
        self.fit.dirs()
    }

    pub fn data(&self) -> &SirData {
        &self.data
    }

    pub fn sir_fit(&self) -> &SirFit {
        &self.fit
    }

    pub fn diagnostics(&self) -> &[FitDiagnostic] {
        self.fit.diagnostics()
    }

    /// Reduced predictors `(X_new − x̄) · dirs` for new raw rows.
    ///
    /// Errors
    /// ------
    /// - `SirError::Numerical(LinalgError::ShapeMismatch)` when `x` does not
    ///   have `p` columns.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> SirResult<Array2<f64>> {
        let p = self.data.npred();
        if x.ncols() != p {
            return Err(SirError::Numerical(LinalgError::ShapeMismatch {
                expected: (x.nrows(), p),
                found: x.dim(),
            }));
        }
        let centered = &x - self.data.x_mean();
        Ok(centered.dot(self.fit.dirs()))
    }

    /// Sequential χ² tests of the number of informative directions.
    pub fn dimension_test(
        &self, maxdim: Option<usize>, method: TestMethod,
    ) -> TestResult<DimensionTest> {
        DimensionTest::from_fit(&self.data, &self.fit, maxdim, method)
    }

    /// Test H0: the EDR space lies within the span of the columns of `hyp`.
    ///
    /// A large p-value means the data are compatible with the response
    /// depending on `X` only through `hypᵀX`. Use
    /// [`coordinate_test_with`](Self::coordinate_test_with) for the
    /// exclusion form.
    pub fn coordinate_test(
        &self, hyp: &Array2<f64>, opts: &CoordinateTestOptions,
    ) -> TestResult<CoordinateTest> {
        self.coordinate_test_with(&CoordinateHypothesis::Contains(hyp.clone()), opts)
    }

    pub fn coordinate_test_with(
        &self, hypothesis: &CoordinateHypothesis, opts: &CoordinateTestOptions,
    ) -> TestResult<CoordinateTest> {
        CoordinateTest::run(&self.data, hypothesis, opts)
    }
}
