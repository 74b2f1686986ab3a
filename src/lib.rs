//! rust_sdr — sufficient dimension reduction by sliced inverse regression.
//!
//! Purpose
//! -------
//! Estimate the effective dimension reduction (EDR) subspace of a regression
//! problem: given a scalar response `y` and predictors `X` (`n×p`), find a
//! few linear combinations of the predictors that carry the dependence of
//! `y` on `X`, and test how many there are and which coordinates they use.
//!
//! Key behaviors
//! -------------
//! - [`linalg`]: stateless centering, whitening, symmetric inverse square
//!   roots, and sorted eigendecompositions over `ndarray`, backed by
//!   `nalgebra`.
//! - [`sir`]: slicing with tie handling, slice means, the SIR kernel matrix,
//!   and EDR directions in original coordinates.
//! - [`statistical_tests`]: the χ² dimension test and the marginal coordinate
//!   test with weighted χ² mixture tails.
//!
//! Conventions
//! -----------
//! - Observations in rows, variables in columns; the response must be sorted
//!   ascending with the rows of `X` permuted to match.
//! - Each subtree owns its error enum (`LinalgError`, `SirError`,
//!   `TestError`) and result alias.
//! - Diagnostics go through the `log` facade; the crate never installs a
//!   logger.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! # use ndarray::Array2;
//! use rust_sdr::sir::prelude::*;
//! use rust_sdr::statistical_tests::prelude::*;
//!
//! let n = 60;
//! let x = Array2::from_shape_fn((n, 2), |(i, j)| ((i * (j + 3)) as f64 * 0.37).sin());
//! let mut rows: Vec<usize> = (0..n).collect();
//! rows.sort_by(|&a, &b| x[[a, 0]].total_cmp(&x[[b, 0]]));
//! let y: Vec<f64> = rows.iter().map(|&i| x[[i, 0]]).collect();
//! let xs = Array2::from_shape_fn((n, 2), |(i, j)| x[[rows[i], j]]);
//!
//! let model = SlicedInverseRegression::fit(xs.view(), &y, &SirOptions::default())?;
//! let dims = model.dimension_test(None, TestMethod::ChiSquare)?;
//! assert_eq!(dims.stats.len(), dims.dfs.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod linalg;
pub mod sir;
pub mod statistical_tests;
