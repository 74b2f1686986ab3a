//! statistical_tests::method — selectors for inferential procedures.
//!
//! Two enums choose how the SIR tests are carried out:
//! - [`TestMethod`] picks the inferential approach. Only the asymptotic χ²
//!   route is implemented; the pseudo-covariate (DIVA) route is recognized by
//!   name and rejected with an explanation.
//! - [`PValueMethod`] picks the tail approximation for weighted χ² mixtures
//!   used by the coordinate test.
//!
//! Both parse case-insensitively from strings via `FromStr`.
use crate::statistical_tests::errors::TestError;
use std::str::FromStr;

/// Inferential method for the dimension and coordinate tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestMethod {
    /// Asymptotic χ² (or χ²-mixture) null distribution.
    #[default]
    ChiSquare,
}

impl FromStr for TestMethod {
    type Err = TestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chisq" | "chi-square" | "chisquare" => Ok(TestMethod::ChiSquare),
            "diva" => Err(TestError::UnsupportedMethod {
                name: s.to_string(),
                reason: "the pseudo-covariate (DIVA) procedure is not implemented; use 'chisq'"
                    .to_string(),
            }),
            _ => Err(TestError::UnsupportedMethod {
                name: s.to_string(),
                reason: "expected 'chisq'".to_string(),
            }),
        }
    }
}

/// Tail approximation for `Q = Σ λⱼ χ²₁`.
///
/// - `Satterthwaite`: match the first two moments with `c·χ²_ν`,
///   `c = Σλ²/Σλ`, `ν = (Σλ)²/Σλ²`.
/// - `Imhof`: numerical inversion of the characteristic function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PValueMethod {
    #[default]
    Satterthwaite,
    Imhof,
}

impl FromStr for PValueMethod {
    type Err = TestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "satterthwaite" => Ok(PValueMethod::Satterthwaite),
            "imhof" => Ok(PValueMethod::Imhof),
            _ => Err(TestError::UnsupportedPValueMethod { name: s.to_string() }),
        }
    }
}
