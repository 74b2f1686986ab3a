//! linalg::errors — error type for the dense linear-algebra helpers.
//!
//! Purpose
//! -------
//! Provide a small error enum and result alias for the numeric transforms in
//! `linalg` (centering, symmetric inverse square roots, whitening). These
//! routines are stateless, so every failure is a property of the input matrix:
//! a shape that cannot be decomposed, a non-finite entry, or a numerical rank
//! deficiency detected during an eigen or QR step.
//!
//! Conventions
//! -----------
//! - Indices carried by variants are 0-based.
//! - Numerical degeneracy is always surfaced as an error instead of letting
//!   NaNs flow into downstream estimators.
//! - Higher-level subtrees wrap [`LinalgError`] in their own error types
//!   (`SirError::Numerical`, `TestError::Numerical`) via `From`.

pub type LinalgResult<T> = Result<T, LinalgError>;

/// LinalgError — failure modes of the dense linear-algebra helpers.
///
/// Variants
/// --------
/// - `EmptyMatrix`
///   The input has zero rows or zero columns.
/// - `NotSquare { rows, cols }`
///   A symmetric routine received a non-square matrix.
/// - `NonFinite { row, col, value }`
///   An entry is NaN or ±∞.
/// - `TooFewRows { rows, cols }`
///   Whitening needs at least as many observations as variables.
/// - `RankDeficient { index, eigenvalue }`
///   A symmetric matrix that must be positive definite has a non-positive
///   (or numerically zero) eigenvalue.
/// - `SingularFactor { index, value }`
///   The triangular QR factor has a numerically zero diagonal entry.
/// - `ShapeMismatch { expected, found }`
///   Two operands have incompatible shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    // ---- Shape ----
    EmptyMatrix,
    NotSquare { rows: usize, cols: usize },
    TooFewRows { rows: usize, cols: usize },
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    // ---- Values ----
    NonFinite { row: usize, col: usize, value: f64 },

    // ---- Numerical rank ----
    RankDeficient { index: usize, eigenvalue: f64 },
    SingularFactor { index: usize, value: f64 },
}

impl std::error::Error for LinalgError {}

impl std::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            LinalgError::EmptyMatrix => write!(f, "Linalg Error: matrix has no rows or no columns"),
            LinalgError::NotSquare { rows, cols } => {
                write!(f, "Linalg Error: expected a square matrix, got {rows}×{cols}")
            }
            LinalgError::TooFewRows { rows, cols } => write!(
                f,
                "Linalg Error: {rows} rows cannot whiten {cols} columns (need rows ≥ columns)"
            ),
            LinalgError::ShapeMismatch { expected, found } => write!(
                f,
                "Linalg Error: shape mismatch, expected {}×{}, found {}×{}",
                expected.0, expected.1, found.0, found.1
            ),

            // ---- Values ----
            LinalgError::NonFinite { row, col, value } => {
                write!(f, "Linalg Error: non-finite entry {value} at ({row}, {col})")
            }

            // ---- Numerical rank ----
            LinalgError::RankDeficient { index, eigenvalue } => write!(
                f,
                "Linalg Error: matrix is numerically rank deficient (eigenvalue {index} = \
                 {eigenvalue})"
            ),
            LinalgError::SingularFactor { index, value } => write!(
                f,
                "Linalg Error: triangular factor is singular (diagonal {index} = {value})"
            ),
        }
    }
}
