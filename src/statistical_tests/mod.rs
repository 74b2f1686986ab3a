//! statistical_tests — inference for fitted SIR models.
//!
//! Purpose
//! -------
//! Provide the two asymptotic χ² procedures that accompany the SIR
//! estimator: the dimension test (how many directions are informative) and
//! the marginal coordinate test (whether a hypothesized subspace is
//! compatible with the estimated structure), together with the method
//! selectors and the weighted χ² mixture tails they rely on.
//!
//! Key behaviors
//! -------------
//! - [`DimensionTest`] reports `(statistic, df, p-value)` per candidate
//!   dimension `k = 0..=maxdim`.
//! - [`CoordinateTest`] reports the statistic, the mixture weights, the
//!   effective degrees of freedom, and a p-value under the chosen
//!   [`PValueMethod`].
//! - Method selectors ([`TestMethod`], [`PValueMethod`]) parse from strings
//!   and reject unsupported names with [`TestError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Tests read the fitted model and never mutate it.
//! - Failures are reported through [`TestResult`]; no routine panics on
//!   user input.

pub mod coordinate;
pub mod dimension;
pub mod errors;
pub mod method;
pub mod mixture;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coordinate::{CoordinateHypothesis, CoordinateTest, CoordinateTestOptions};
pub use self::dimension::{DimensionTest, max_testable_dimension};
pub use self::errors::{TestError, TestResult};
pub use self::method::{PValueMethod, TestMethod};
pub use self::mixture::{MixtureTail, mixture_upper_tail};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::coordinate::{CoordinateHypothesis, CoordinateTest, CoordinateTestOptions};
    pub use super::dimension::DimensionTest;
    pub use super::errors::{TestError, TestResult};
    pub use super::method::{PValueMethod, TestMethod};
}
