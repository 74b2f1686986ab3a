//! linalg — stateless dense linear algebra for dimension reduction.
//!
//! Purpose
//! -------
//! Collect the numeric primitives that the SIR estimator and its tests build
//! on: column centering, whitening, symmetric inverse square roots, sorted
//! symmetric eigendecompositions, and orthonormal bases. All routines are
//! free functions over immutable `ndarray` views; decompositions are delegated
//! to `nalgebra` through the [`bridge`] module.
//!
//! Key behaviors
//! -------------
//! - [`center`] and [`whiten`] turn raw predictors into data with identity
//!   sample covariance, under either [`Whitening`] policy.
//! - [`sym_inv_sqrt`] provides `S^{-1/2}` and reports rank deficiency through
//!   [`LinalgError::RankDeficient`] instead of returning NaNs.
//! - [`descending_eigen`] fixes the eigen ordering contract (largest first)
//!   that the estimator and the dimension test rely on.
//!
//! Conventions
//! -----------
//! - Observations in rows, variables in columns.
//! - Covariances are normalized by `1/n`.
//! - This module never logs and holds no global state.

pub mod bridge;
pub mod errors;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bridge::{descending_eigen, to_array2, to_dmatrix};
pub use self::errors::{LinalgError, LinalgResult};
pub use self::transforms::{
    RANK_TOL, Whitened, Whitening, center, orthogonal_complement, orthonormalize, sym_inv_sqrt,
    whiten,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{LinalgError, LinalgResult};
    pub use super::transforms::{Whitened, Whitening, center, sym_inv_sqrt, whiten};
}
