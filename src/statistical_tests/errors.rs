//! statistical_tests::errors — error types for the SIR inferential procedures.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the dimension test, the
//! coordinate test, the method selectors, and the χ² mixture approximations.
//!
//! Key behaviors
//! -------------
//! - Define [`TestError`] and [`TestResult`] as the canonical error and result
//!   types for the `statistical_tests` subtree.
//! - Wrap [`LinalgError`] through `From` so numerical failures inside the
//!   coordinate test (orthonormalizing a hypothesis, inverse square roots,
//!   eigendecompositions) propagate with `?`.
//!
//! Conventions
//! -----------
//! - Unsupported method selectors are fatal and reported when a selector is
//!   parsed, before any computation runs.
//! - Failures reported by `statrs` distribution constructors are carried as
//!   their message in [`TestError::Distribution`].
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed their payloads and that
//!   `source()` exposes wrapped linear-algebra errors.
use crate::linalg::LinalgError;

pub type TestResult<T> = Result<T, TestError>;

/// TestError — failure conditions for dimension and coordinate tests.
///
/// Variants
/// --------
/// - `UnsupportedMethod { name, reason }`
///   The inferential method selector is unknown or not implemented.
/// - `UnsupportedPValueMethod { name }`
///   The χ² mixture approximation selector is unknown.
/// - `NoTestableDimension { p, nslice }`
///   No candidate dimension has positive degrees of freedom
///   (needs `p ≥ 1` and `nslice ≥ 2`).
/// - `HypothesisShape { expected_rows, found_rows }`
///   The hypothesis matrix does not have one row per predictor.
/// - `EmptyHypothesis`
///   The hypothesis matrix has no columns.
/// - `WeightMismatch { slice, stored, recomputed }`
///   Slice weights recomputed from the boundaries disagree with the stored
///   occupancy fractions.
/// - `Distribution(String)`
///   A `statrs` distribution could not be constructed.
/// - `IntegrationBudget { required, limit }`
///   The Imhof integral needs more quadrature steps than allowed.
/// - `Numerical(LinalgError)`
///   Failure inside a decomposition or inverse square root.
#[derive(Debug, Clone, PartialEq)]
pub enum TestError {
    // ---- Selectors ----
    UnsupportedMethod { name: String, reason: String },
    UnsupportedPValueMethod { name: String },

    // ---- Input validation ----
    NoTestableDimension { p: usize, nslice: usize },
    HypothesisShape { expected_rows: usize, found_rows: usize },
    EmptyHypothesis,
    WeightMismatch { slice: usize, stored: f64, recomputed: f64 },

    // ---- Numerical ----
    Distribution(String),
    IntegrationBudget { required: usize, limit: usize },
    Numerical(LinalgError),
}

impl From<LinalgError> for TestError {
    fn from(err: LinalgError) -> Self {
        TestError::Numerical(err)
    }
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TestError::Numerical(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Selectors ----
            TestError::UnsupportedMethod { name, reason } => {
                write!(f, "Test Error: unsupported method '{name}': {reason}")
            }
            TestError::UnsupportedPValueMethod { name } => write!(
                f,
                "Test Error: unsupported p-value method '{name}'; expected 'satterthwaite' or \
                 'imhof'"
            ),

            // ---- Input validation ----
            TestError::NoTestableDimension { p, nslice } => write!(
                f,
                "Test Error: no testable dimension with {p} predictors and {nslice} slices \
                 (need p ≥ 1 and at least 2 slices)"
            ),
            TestError::HypothesisShape { expected_rows, found_rows } => write!(
                f,
                "Test Error: hypothesis has {found_rows} rows but the model has \
                 {expected_rows} predictors"
            ),
            TestError::EmptyHypothesis => {
                write!(f, "Test Error: hypothesis matrix has no columns")
            }
            TestError::WeightMismatch { slice, stored, recomputed } => write!(
                f,
                "Test Error: slice {slice} weight {stored} disagrees with {recomputed} \
                 recomputed from the boundaries"
            ),

            // ---- Numerical ----
            TestError::Distribution(msg) => write!(f, "Test Error: distribution error: {msg}"),
            TestError::IntegrationBudget { required, limit } => write!(
                f,
                "Test Error: Imhof integration needs {required} steps, above the limit of \
                 {limit}; use the Satterthwaite p-value method"
            ),
            TestError::Numerical(err) => write!(f, "Test Error: {err}"),
        }
    }
}
