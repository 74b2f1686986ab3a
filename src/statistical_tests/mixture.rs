//! statistical_tests::mixture — upper tails of weighted χ² mixtures.
//!
//! Purpose
//! -------
//! Approximate `P(Q > x)` for `Q = Σⱼ λⱼ Zⱼ²` with independent standard normal
//! `Zⱼ` and non-negative weights `λⱼ`. This is the asymptotic null law of the
//! coordinate-test statistic.
//!
//! Key behaviors
//! -------------
//! - [`PValueMethod::Satterthwaite`]: two-moment match `Q ≈ c·χ²_ν` with
//!   `c = Σλ²/Σλ` and `ν = (Σλ)²/Σλ²`; exact when all weights are equal.
//! - [`PValueMethod::Imhof`]: Imhof (1961) inversion
//!   `P(Q > x) = ½ + (1/π) ∫₀^∞ sin θ(u) / (u ρ(u)) du` with
//!   `θ(u) = ½ Σ atan(λⱼu) − ½xu` and `ρ(u) = Π (1 + λⱼ²u²)^{1/4}`,
//!   integrated with composite Simpson's rule on `[0, U]`.
//! - Both report the Satterthwaite effective degrees of freedom `ν`.
//!
//! Imhof truncation and step size
//! ------------------------------
//! - `U` is the smallest power of two whose truncation bound is at most
//!   [`IMHOF_TRUNCATION_TOL`]. Two bounds are used and the smaller wins:
//!   - Imhof's absolute bound `2 / (π m U^{m/2} Π λⱼ^{1/2})` over the `m`
//!     largest weights, minimized over `m`. Restricting to the dominant
//!     weights keeps negligible weights from inflating `U`.
//!   - For `x > S(U) = Σ λⱼ / (1 + λⱼ²U²)`, the oscillation bound
//!     `4 / (π (x − S(U)) U ρ(U))` from the second mean value theorem.
//! - The step resolves the fastest oscillation of `sin θ`, whose angular
//!   frequency is at most `½(x + Σλ)`, with [`IMHOF_POINTS_PER_PERIOD`]
//!   nodes per period.
//! - Far in the tail, when the Chernoff bound `e^{−x/4} Π (1 − λⱼ/2)^{−1/2}`
//!   (weights normalized to a maximum of one) is already below
//!   [`IMHOF_TRUNCATION_TOL`], that bound is returned without integrating.
//! - When the required step count exceeds [`IMHOF_MAX_STEPS`], the
//!   computation fails with `TestError::IntegrationBudget` instead of
//!   returning an aliased value.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights at or below `RANK_TOL · max λ` are treated as zero and dropped.
//! - With no positive weight, `Q ≡ 0`; the tail is reported as `1` with
//!   `ν = 0`.
//! - Returned probabilities are clamped to `[0, 1]`.
use crate::linalg::RANK_TOL;
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    method::PValueMethod,
};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::f64::consts::PI;

/// Target bound on the Imhof truncation error.
pub const IMHOF_TRUNCATION_TOL: f64 = 1e-6;

/// Simpson nodes per period of the fastest oscillation of the integrand.
pub const IMHOF_POINTS_PER_PERIOD: f64 = 64.0;

/// Largest number of Simpson steps attempted by the Imhof method.
pub const IMHOF_MAX_STEPS: usize = 4_000_000;

/// Largest upper integration limit (in normalized units) searched for.
const IMHOF_MAX_LIMIT: f64 = 1e9;

const IMHOF_MIN_STEPS: usize = 1_000;

/// Tail probability and effective degrees of freedom of a χ² mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureTail {
    pub p_value: f64,
    pub df: f64,
}

/// mixture_upper_tail — `P(Σ λⱼ χ²₁ > stat)` under the chosen approximation.
///
/// Parameters
/// ----------
/// - `stat`: `f64`
///   Observed statistic (non-negative).
/// - `weights`: `&[f64]`
///   Mixture weights; negative or negligible entries are ignored.
/// - `method`: [`PValueMethod`]
///
/// Returns
/// -------
/// `TestResult<MixtureTail>`
///
/// Errors
/// ------
/// - `TestError::Distribution` if a χ² distribution cannot be built.
/// - `TestError::IntegrationBudget` if the Imhof integral would need more
///   than [`IMHOF_MAX_STEPS`] Simpson steps.
pub fn mixture_upper_tail(
    stat: f64, weights: &[f64], method: PValueMethod,
) -> TestResult<MixtureTail> {
    let lambdas = positive_weights(weights);
    let a: f64 = lambdas.iter().sum();
    let b: f64 = lambdas.iter().map(|l| l * l).sum();
    if lambdas.is_empty() || a <= 0.0 {
        return Ok(MixtureTail { p_value: 1.0, df: 0.0 });
    }
    let df = a * a / b;

    let p_value = match method {
        PValueMethod::Satterthwaite => chi_square_sf(stat * a / b, df)?,
        PValueMethod::Imhof if stat <= 0.0 => 1.0,
        PValueMethod::Imhof if lambdas.len() == 1 => chi_square_sf(stat / lambdas[0], 1.0)?,
        PValueMethod::Imhof => imhof_upper_tail(stat, &lambdas)?,
    };
    Ok(MixtureTail { p_value: p_value.clamp(0.0, 1.0), df })
}

// ---- Helper methods ----

fn positive_weights(weights: &[f64]) -> Vec<f64> {
    let max = weights.iter().fold(0.0_f64, |acc, &w| acc.max(w));
    weights.iter().copied().filter(|&w| w > RANK_TOL * max && w > 0.0).collect()
}

pub(crate) fn chi_square_sf(x: f64, df: f64) -> TestResult<f64> {
    let dist = ChiSquared::new(df).map_err(|err| TestError::Distribution(err.to_string()))?;
    Ok(dist.sf(x))
}

/// Imhof inversion with weights normalized by their maximum.
fn imhof_upper_tail(stat: f64, lambdas: &[f64]) -> TestResult<f64> {
    let max = lambdas.iter().fold(0.0_f64, |acc, &l| acc.max(l));
    let mut lam: Vec<f64> = lambdas.iter().map(|l| l / max).collect();
    lam.sort_by(|a, b| b.total_cmp(a));
    let x = stat / max;
    let sum: f64 = lam.iter().sum();

    let log_chernoff = -0.25 * x - 0.5 * lam.iter().map(|l| (-0.5 * l).ln_1p()).sum::<f64>();
    if log_chernoff < IMHOF_TRUNCATION_TOL.ln() {
        return Ok(log_chernoff.exp());
    }

    let upper = imhof_truncation_point(x, &lam);
    let max_freq = 0.5 * (x + sum) + 1.0;
    let h_max = 2.0 * PI / (IMHOF_POINTS_PER_PERIOD * max_freq);
    let required = (upper / h_max).ceil();
    if !required.is_finite() || required > IMHOF_MAX_STEPS as f64 {
        return Err(TestError::IntegrationBudget {
            required: if required.is_finite() { required as usize } else { usize::MAX },
            limit: IMHOF_MAX_STEPS,
        });
    }
    let mut steps = (required as usize).max(IMHOF_MIN_STEPS);
    if steps % 2 == 1 {
        steps += 1;
    }

    let h = upper / steps as f64;
    let integrand = |u: f64| -> f64 {
        if u == 0.0 {
            return 0.5 * (sum - x);
        }
        let theta = 0.5 * lam.iter().map(|l| (l * u).atan()).sum::<f64>() - 0.5 * x * u;
        theta.sin() / (u * log_rho(&lam, u).exp())
    };

    let mut acc = integrand(0.0) + integrand(upper);
    for i in 1..steps {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        acc += weight * integrand(i as f64 * h);
    }
    Ok(0.5 + acc * h / (3.0 * PI))
}

/// `ln ρ(u) = ¼ Σ ln(1 + λⱼ²u²)`.
fn log_rho(lam: &[f64], u: f64) -> f64 {
    lam.iter().map(|l| 0.25 * (l * l * u * u).ln_1p()).sum()
}

/// Upper limit `U` for the Imhof integral, for normalized weights sorted in
/// decreasing order.
pub(crate) fn imhof_truncation_point(x: f64, lam: &[f64]) -> f64 {
    let mut upper = 1.0;
    while upper < IMHOF_MAX_LIMIT && truncation_bound(x, lam, upper) > IMHOF_TRUNCATION_TOL {
        upper *= 2.0;
    }
    upper
}

fn truncation_bound(x: f64, lam: &[f64], upper: f64) -> f64 {
    let mut best = f64::INFINITY;
    let mut log_root_prod = 0.0;
    for (idx, l) in lam.iter().enumerate() {
        let m = (idx + 1) as f64;
        log_root_prod += 0.5 * l.ln();
        let log_bound = (2.0 / (PI * m)).ln() - 0.5 * m * upper.ln() - log_root_prod;
        best = best.min(log_bound.exp());
    }

    let s: f64 = lam.iter().map(|l| l / (1.0 + l * l * upper * upper)).sum();
    if x > s {
        let log_bound = (4.0 / (PI * (x - s))).ln() - upper.ln() - log_rho(lam, upper);
        best = best.min(log_bound.exp());
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exactness of Satterthwaite for a single weight and for equal weights.
    // - Imhof against closed-form tails (χ²₄ and sums of two scaled χ²₂),
    //   including widely spread weights and large statistics.
    // - The truncation point staying moderate when some weights are tiny.
    // - The degenerate all-zero mixture.
    // -------------------------------------------------------------------------

    /// `P(a·χ²₂ + b·χ²₂ > x)` for `a ≠ b`: a difference of exponentials.
    fn two_exponential_tail(a: f64, b: f64, x: f64) -> f64 {
        (a * (-x / (2.0 * a)).exp() - b * (-x / (2.0 * b)).exp()) / (a - b)
    }

    #[test]
    // Purpose
    // -------
    // Satterthwaite is exact for one weight and for equal weights.
    //
    // Given
    // -----
    // - weights [2.0] with stat 3.0; weights [1,1,1,1] with stat 5.0.
    //
    // Expect
    // ------
    // - p = P(χ²₁ > 1.5) and p = P(χ²₄ > 5) = e^{-2.5}(1 + 2.5); df 1 and 4.
    fn satterthwaite_is_exact_for_equal_weights() {
        // Act
        let single = mixture_upper_tail(3.0, &[2.0], PValueMethod::Satterthwaite).unwrap();
        let equal = mixture_upper_tail(5.0, &[1.0; 4], PValueMethod::Satterthwaite).unwrap();

        // Assert
        let expected = ChiSquared::new(1.0).unwrap().sf(1.5);
        assert_abs_diff_eq!(single.p_value, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(single.df, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(equal.p_value, (-2.5_f64).exp() * 3.5, epsilon = 1e-10);
        assert_abs_diff_eq!(equal.df, 4.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check Imhof inversion against closed-form tail probabilities.
    //
    // Given
    // -----
    // - weights [1,1,1,1], stat 5: Q ~ χ²₄, tail e^{-2.5}·3.5 ≈ 0.2873.
    // - weights [2,2,1,1], stat 6: Q = 2χ²₂ + χ²₂, a sum of exponentials with
    //   means 4 and 2, tail 2e^{-x/4} − e^{-x/2}.
    //
    // Expect
    // ------
    // - Both agree with the closed form to 1e-3.
    fn imhof_matches_closed_form_tails() {
        // Act
        let chi4 = mixture_upper_tail(5.0, &[1.0; 4], PValueMethod::Imhof).unwrap();
        let mixed = mixture_upper_tail(6.0, &[2.0, 2.0, 1.0, 1.0], PValueMethod::Imhof).unwrap();

        // Assert
        assert_abs_diff_eq!(chi4.p_value, (-2.5_f64).exp() * 3.5, epsilon = 1e-3);
        assert_abs_diff_eq!(mixed.p_value, two_exponential_tail(2.0, 1.0, 6.0), epsilon = 1e-3);
        assert_abs_diff_eq!(mixed.df, 36.0 / 10.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Imhof stays accurate when weights span several orders of magnitude,
    // at moderate and large statistics.
    //
    // Given
    // -----
    // - weights [1,1,0.01,0.01] at x ∈ {6, 20, 40, 200}.
    // - weights [1,1,1e-6,1e-6] at x ∈ {40, 200}.
    //
    // Expect
    // ------
    // - Agreement with the closed form to 1e-4 at x = 6 and 1e-5 at x ∈ {20, 40}
    //   (both x = 40 cases run the full integration).
    // - Tails at x = 200 (exactly ≈ 4e-44) are below 1e-5 rather than an
    //   aliased value.
    fn imhof_handles_spread_weights_and_large_statistics() {
        // Arrange
        let spread = [1.0, 1.0, 0.01, 0.01];
        let extreme = [1.0, 1.0, 1e-6, 1e-6];

        // Act
        let moderate = mixture_upper_tail(6.0, &spread, PValueMethod::Imhof).unwrap();
        let upper = mixture_upper_tail(20.0, &spread, PValueMethod::Imhof).unwrap();
        let far = mixture_upper_tail(200.0, &spread, PValueMethod::Imhof).unwrap();
        let mid = mixture_upper_tail(40.0, &spread, PValueMethod::Imhof).unwrap();
        let mid_extreme = mixture_upper_tail(40.0, &extreme, PValueMethod::Imhof).unwrap();
        let far_extreme = mixture_upper_tail(200.0, &extreme, PValueMethod::Imhof).unwrap();

        // Assert
        assert_abs_diff_eq!(moderate.p_value, two_exponential_tail(1.0, 0.01, 6.0), epsilon = 1e-4);
        assert_abs_diff_eq!(upper.p_value, two_exponential_tail(1.0, 0.01, 20.0), epsilon = 1e-5);
        assert_abs_diff_eq!(mid.p_value, two_exponential_tail(1.0, 0.01, 40.0), epsilon = 1e-5);
        let exact = two_exponential_tail(1.0, 1e-6, 40.0);
        assert_abs_diff_eq!(mid_extreme.p_value, exact, epsilon = 1e-5);
        assert!(far.p_value < 1e-5, "p = {}", far.p_value);
        assert!(far_extreme.p_value < 1e-5, "p = {}", far_extreme.p_value);
    }

    #[test]
    // Purpose
    // -------
    // Negligible weights must not push the truncation point out.
    //
    // Given
    // -----
    // - Normalized weights [1,1,1e-6,1e-6] at x ∈ {1, 200}.
    //
    // Expect
    // ------
    // - U stays below 1e4 in both cases.
    fn imhof_truncation_ignores_negligible_weights() {
        // Arrange
        let lam = [1.0, 1.0, 1e-6, 1e-6];

        // Act
        let small = imhof_truncation_point(1.0, &lam);
        let large = imhof_truncation_point(200.0, &lam);

        // Assert
        assert!(small < 1e4, "U = {small}");
        assert!(large < 1e4, "U = {large}");
        assert!(large <= small);
    }

    #[test]
    // Purpose
    // -------
    // An integral that cannot be resolved within the step budget is an
    // error, not a silently aliased value.
    //
    // Given
    // -----
    // - weights [1, 1] and stat 1e-7 (truncation needs U ≈ 5e5).
    //
    // Expect
    // ------
    // - `TestError::IntegrationBudget` with `required > limit`; Satterthwaite
    //   still answers.
    fn imhof_reports_exhausted_step_budget() {
        // Act
        let imhof = mixture_upper_tail(1e-7, &[1.0, 1.0], PValueMethod::Imhof);
        let satt = mixture_upper_tail(1e-7, &[1.0, 1.0], PValueMethod::Satterthwaite).unwrap();

        // Assert
        match imhof {
            Err(TestError::IntegrationBudget { required, limit }) => {
                assert_eq!(limit, IMHOF_MAX_STEPS);
                assert!(required > limit);
            }
            other => panic!("expected IntegrationBudget, got {other:?}"),
        }
        assert!(satt.p_value > 0.99);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a mixture without positive weights is handled without dividing
    // by zero.
    //
    // Given
    // -----
    // - weights [0, -1e-18] and stat 0.
    //
    // Expect
    // ------
    // - p = 1 and df = 0 for both methods.
    fn zero_mixture_has_unit_tail() {
        for method in [PValueMethod::Satterthwaite, PValueMethod::Imhof] {
            // Act
            let tail = mixture_upper_tail(0.0, &[0.0, -1e-18], method).unwrap();

            // Assert
            assert_eq!(tail, MixtureTail { p_value: 1.0, df: 0.0 });
        }
    }
}
