//! sir — sliced inverse regression.
//!
//! Purpose
//! -------
//! Estimate the effective dimension reduction (EDR) subspace of a regression
//! of a scalar response on a multivariate predictor. The pipeline is
//! validation → centering and whitening → slicing the sorted response →
//! slice means → kernel matrix → eigendecomposition → directions mapped back
//! to the original coordinates.
//!
//! Key behaviors
//! -------------
//! - [`SirData`] is the immutable preprocessing result; [`SirFit`] is a pure
//!   function of it plus a direction count. [`SlicedInverseRegression`] owns
//!   both and is the usual entry point.
//! - [`slicer`] never splits a group of tied responses across slices.
//! - Requesting more directions than predictors is clamped and reported as a
//!   [`FitDiagnostic`].
//!
//! Conventions
//! -----------
//! - Observations in rows, variables in columns; the response is sorted
//!   ascending by the caller with `X` permuted to match.
//! - Slice boundaries are 0-based and half-open: slice `s` is
//!   `bd[s]..bd[s + 1]`.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests; `tests/integration_sir_pipeline.rs`
//!   exercises the full pipeline on simulated single-index data.

pub mod data;
pub mod errors;
pub mod fit;
pub mod model;
pub mod options;
pub mod slice_means;
pub mod slicing;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::SirData;
pub use self::errors::{SirError, SirResult};
pub use self::fit::{FitDiagnostic, SirFit};
pub use self::model::SlicedInverseRegression;
pub use self::options::{SirOptions, default_ndir, default_nslice};
pub use self::slice_means::slice_means;
pub use self::slicing::{
    bucket_distinct_values, locate_distinct_boundaries, slice_assignments, slice_weights, slicer,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{SirError, SirResult};
    pub use super::model::SlicedInverseRegression;
    pub use super::options::SirOptions;
}
