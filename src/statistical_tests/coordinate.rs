//! statistical_tests::coordinate — marginal coordinate test for SIR.
//!
//! Purpose
//! -------
//! Test a hypothesis about which predictor directions matter, expressed as a
//! `p×k` matrix `H` of directions in original coordinates. Following Cook
//! (2004), the statistic projects the whitened slice means onto the tested
//! directions; its asymptotic null law is a weighted sum of independent χ²₁
//! variables whose weights come from a Kronecker-structured covariance.
//!
//! Key behaviors
//! -------------
//! - [`CoordinateHypothesis::Excludes`] tests H0: the directions in `H` carry
//!   no information about the response.
//! - [`CoordinateHypothesis::Contains`] tests H0: the EDR space lies within
//!   `span(H)`, by testing that the orthogonal complement of `span(H)` carries
//!   no information. When the complement is empty the statistic is `0` and
//!   the p-value is `1`.
//! - The mixture tail is computed by `statistical_tests::mixture` under the
//!   configured [`PValueMethod`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Whitened data are recomputed as `Zₛ = X · Sri` with
//!   `Sri = (XᵀX/n)^{-1/2}`, so the result does not depend on the whitening
//!   policy used to fit the model.
//! - The statistic is invariant to the choice of basis for `span(H)`.
//! - Slice weights recomputed from the boundaries must match the stored
//!   occupancy fractions.
//!
//! Conventions
//! -----------
//! - Slice indicators are scaled by `1/√fwₛ`, then residualized on `X` with
//!   an intercept (column centering, then removal of the projection onto the
//!   thin Q factor of `X`).
//! - `Ω = KᵀK/n` where row `i` of `K` is `gᵢ ⊗ wᵢ` (index `s·r + j`), `gᵢ`
//!   the residualized indicators and `wᵢ = αᵀ zₛ,ᵢ` the projected predictors.
//!
//! Testing notes
//! -------------
//! - Unit tests check basis invariance, independence from the whitening
//!   policy, the `Contains`/`Excludes` duality, the empty complement, and
//!   shape errors. Power and size on simulated data live in the integration
//!   tests.
use crate::linalg::{
    descending_eigen, orthogonal_complement, orthonormalize, sym_inv_sqrt, to_array2, to_dmatrix,
};
use crate::sir::{data::SirData, slice_means::slice_means, slicing::slice_weights};
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    method::{PValueMethod, TestMethod},
    mixture::mixture_upper_tail,
};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Tolerance when comparing recomputed slice weights with stored ones.
const WEIGHT_TOL: f64 = 1e-12;

/// Hypothesis about the EDR space, as directions in original coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateHypothesis {
    /// H0: the EDR space is contained in the span of the columns.
    Contains(Array2<f64>),
    /// H0: the columns span directions that carry no information.
    Excludes(Array2<f64>),
}

impl CoordinateHypothesis {
    /// Hypothesis matrix as supplied by the caller.
    pub fn matrix(&self) -> &Array2<f64> {
        match self {
            CoordinateHypothesis::Contains(h) | CoordinateHypothesis::Excludes(h) => h,
        }
    }
}

/// Options for the coordinate test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinateTestOptions {
    pub method: TestMethod,
    pub pmethod: PValueMethod,
}

/// CoordinateTest — outcome of a coordinate hypothesis test.
///
/// Fields
/// ------
/// - `stat`: `f64` — `n · Σₛ ‖αᵀ smₛ‖² fwₛ`.
/// - `df`: `f64` — effective degrees of freedom of the null mixture.
/// - `p_value`: `f64` — approximate `P(Q > stat)` under H0.
/// - `weights`: `Array1<f64>` — mixture weights (eigenvalues of `Ω`),
///   decreasing and non-negative.
/// - `ntested`: `usize` — number of directions actually tested.
/// - `pmethod`: [`PValueMethod`] used for the tail.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateTest {
    pub stat: f64,
    pub df: f64,
    pub p_value: f64,
    pub weights: Array1<f64>,
    pub ntested: usize,
    pub pmethod: PValueMethod,
}

impl CoordinateTest {
    /// Run the coordinate test on preprocessed SIR data.
    ///
    /// Errors
    /// ------
    /// - `TestError::HypothesisShape` when `H` does not have `p` rows.
    /// - `TestError::EmptyHypothesis` when `H` has no columns.
    /// - `TestError::WeightMismatch` when stored slice weights disagree with
    ///   the boundaries.
    /// - `TestError::Numerical` when `H` has dependent columns or the
    ///   predictor covariance is singular.
    pub fn run(
        data: &SirData, hypothesis: &CoordinateHypothesis, opts: &CoordinateTestOptions,
    ) -> TestResult<Self> {
        let h = hypothesis.matrix();
        let p = data.npred();
        if h.nrows() != p {
            return Err(TestError::HypothesisShape { expected_rows: p, found_rows: h.nrows() });
        }
        if h.ncols() == 0 {
            return Err(TestError::EmptyHypothesis);
        }

        let tested = match hypothesis {
            CoordinateHypothesis::Excludes(h) => h.clone(),
            CoordinateHypothesis::Contains(h) => orthogonal_complement(h.view())?,
        };
        if tested.ncols() == 0 {
            return Ok(CoordinateTest {
                stat: 0.0,
                df: 0.0,
                p_value: 1.0,
                weights: Array1::zeros(0),
                ntested: 0,
                pmethod: opts.pmethod,
            });
        }

        match opts.method {
            TestMethod::ChiSquare => chi_square_coordinate_test(data, tested.view(), opts.pmethod),
        }
    }
}

// ---- Helper methods ----

fn chi_square_coordinate_test(
    data: &SirData, tested: ArrayView2<'_, f64>, pmethod: PValueMethod,
) -> TestResult<CoordinateTest> {
    verify_weights(data)?;

    let x = data.x();
    let n = data.nobs() as f64;
    let bd = data.bd();

    let cov = x.t().dot(x) / n;
    let sri = sym_inv_sqrt(cov.view())?;
    let zs = x.dot(&sri);
    let alpha = orthonormalize(sri.dot(&tested).view())?;

    let (sm, fw) = slice_means(zs.view(), bd);
    let root_fw = fw.mapv(f64::sqrt);
    let projected = alpha.t().dot(&sm) * &root_fw;
    let stat = n * projected.iter().map(|v| v * v).sum::<f64>();

    let g = residualized_indicators(x.view(), bd, &root_fw);
    let w = zs.dot(&alpha);
    let omega = kronecker_covariance(g.view(), w.view());
    let (mut weights, _) = descending_eigen(omega.view())?;
    weights.mapv_inplace(|v| v.max(0.0));

    let tail = mixture_upper_tail(stat, weights.as_slice().unwrap_or(&[]), pmethod)?;
    Ok(CoordinateTest {
        stat,
        df: tail.df,
        p_value: tail.p_value,
        weights,
        ntested: alpha.ncols(),
        pmethod,
    })
}

fn verify_weights(data: &SirData) -> TestResult<()> {
    let recomputed = slice_weights(data.bd());
    for (slice, (&stored, &fresh)) in data.fw().iter().zip(recomputed.iter()).enumerate() {
        if (stored - fresh).abs() > WEIGHT_TOL {
            return Err(TestError::WeightMismatch { slice, stored, recomputed: fresh });
        }
    }
    Ok(())
}

/// Slice indicators scaled by `1/√fwₛ`, residualized on `[1, X]`.
fn residualized_indicators(
    x: ArrayView2<'_, f64>, bd: &[usize], root_fw: &Array1<f64>,
) -> Array2<f64> {
    let n = x.nrows();
    let mut g = Array2::<f64>::zeros((n, root_fw.len()));
    for (s, w) in bd.windows(2).enumerate() {
        for i in w[0]..w[1] {
            g[[i, s]] = 1.0 / root_fw[s];
        }
    }
    if let Some(mean) = g.mean_axis(Axis(0)) {
        g -= &mean;
    }
    let q = to_array2(&to_dmatrix(x).qr().q());
    let fitted = q.dot(&q.t().dot(&g));
    g - fitted
}

/// `Ω = (1/n) Σᵢ (gᵢgᵢᵀ) ⊗ (wᵢwᵢᵀ)`, formed as `KᵀK/n`.
fn kronecker_covariance(g: ArrayView2<'_, f64>, w: ArrayView2<'_, f64>) -> Array2<f64> {
    let (n, h) = g.dim();
    let r = w.ncols();
    let mut k = Array2::<f64>::zeros((n, h * r));
    for i in 0..n {
        for s in 0..h {
            for j in 0..r {
                k[[i, s * r + j]] = g[[i, s]] * w[[i, j]];
            }
        }
    }
    k.t().dot(&k) / n as f64
}
