//! sir::fit — kernel matrix, eigenstructure, and EDR directions.
//!
//! Purpose
//! -------
//! Turn preprocessed SIR data into a fitted result: the SIR kernel matrix `M`
//! (weighted covariance of slice means), its eigendecomposition ordered by
//! decreasing eigenvalue, and the leading eigenvectors mapped back to the
//! original predictor coordinates as unit-norm directions.
//!
//! Key behaviors
//! -------------
//! - [`SirFit::new`] is a pure function of `(&SirData, ndir)`.
//! - [`SirFit::with_directions`] recomputes only the directions from the
//!   cached eigenvectors, so changing `ndir` never repeats slicing or the
//!   kernel computation.
//! - Requests for more directions than predictors are clamped to `p`; the
//!   clamp is logged at `warn` level and recorded as a [`FitDiagnostic`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `M = Σₛ fwₛ (smₛ − m̄)(smₛ − m̄)ᵀ` with `m̄ = Σₛ fwₛ smₛ` (population
//!   normalization, no small-sample correction).
//! - `eigs` is non-negative and non-increasing; eigenvalues within
//!   `RANK_TOL · max|λ|` below zero are rounding and are set to zero.
//! - Each column of `dirs` has unit Euclidean norm, and its largest-magnitude
//!   coordinate is positive.
//!
//! Conventions
//! -----------
//! - The whitening transform satisfies `Z = X · trans`, so a whitened
//!   direction `b` maps to `trans · b` in original coordinates.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the single-predictor paired-ties scenario, eigen
//!   ordering and non-negativity, unit-norm directions, clamping, and
//!   idempotence of refitting.
use crate::linalg::{RANK_TOL, descending_eigen};
use crate::sir::{
    data::SirData,
    errors::{SirError, SirResult},
    options::verify_ndir,
};
use ndarray::{Array1, Array2, ArrayView2, Axis, s};

/// Non-fatal conditions recorded while fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitDiagnostic {
    /// More directions were requested than eigenvectors exist.
    DirectionsClamped { requested: usize, available: usize },
}

/// SirFit — fitted SIR eigenstructure and directions.
///
/// Fields
/// ------
/// - `kernel`: `Array2<f64>` — the `p×p` kernel matrix `M`.
/// - `eigs`: `Array1<f64>` — eigenvalues of `M`, decreasing.
/// - `eigv`: `Array2<f64>` — matching eigenvectors (columns), whitened space.
/// - `dirs`: `Array2<f64>` — `p×ndir` unit directions in original coordinates.
/// - `ndir`: `usize` — number of directions actually returned.
/// - `diagnostics`: `Vec<FitDiagnostic>` — non-fatal conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct SirFit {
    kernel: Array2<f64>,
    eigs: Array1<f64>,
    eigv: Array2<f64>,
    dirs: Array2<f64>,
    ndir: usize,
    diagnostics: Vec<FitDiagnostic>,
}

impl SirFit {
    /// Fit SIR directions from preprocessed data.
    ///
    /// Parameters
    /// ----------
    /// - `data`: `&SirData`
    ///   Preprocessed input (slice means, weights, whitening transform).
    /// - `ndir`: `usize`
    ///   Requested number of directions (≥ 1). Values above `p` are clamped.
    ///
    /// Returns
    /// -------
    /// `SirResult<SirFit>`
    ///
    /// Errors
    /// ------
    /// - `SirError::InvalidDirectionCount` when `ndir == 0`.
    /// - `SirError::KernelNotPositiveSemiDefinite` when `M` has a clearly
    ///   negative eigenvalue.
    /// - `SirError::Numerical` when the eigendecomposition input is invalid.
    pub fn new(data: &SirData, ndir: usize) -> SirResult<Self> {
        verify_ndir(ndir)?;
        let kernel = kernel_matrix(data.sm().view(), data.fw());
        let (eigs, eigv) = nonnegative_eigen(kernel.view())?;
        let (dirs, ndir, diagnostics) = directions(data.trans().view(), eigv.view(), ndir);
        Ok(SirFit { kernel, eigs, eigv, dirs, ndir, diagnostics })
    }

    /// Same fit with a different number of directions.
    ///
    /// Reuses the kernel and eigenvectors; only the back-mapping and
    /// normalization are repeated. `data` must be the value this fit was
    /// computed from.
    pub fn with_directions(&self, data: &SirData, ndir: usize) -> SirResult<Self> {
        verify_ndir(ndir)?;
        let (dirs, ndir, diagnostics) = directions(data.trans().view(), self.eigv.view(), ndir);
        Ok(SirFit {
            kernel: self.kernel.clone(),
            eigs: self.eigs.clone(),
            eigv: self.eigv.clone(),
            dirs,
            ndir,
            diagnostics,
        })
    }

    /// Kernel matrix `M`.
    pub fn kernel(&self) -> &Array2<f64> {
        &self.kernel
    }

    /// Eigenvalues of `M`, largest first.
    pub fn eigs(&self) -> &Array1<f64> {
        &self.eigs
    }

    /// Eigenvectors of `M` in whitened coordinates.
    pub fn eigv(&self) -> &Array2<f64> {
        &self.eigv
    }

    /// Estimated EDR directions in original coordinates (`p×ndir`).
    pub fn dirs(&self) -> &Array2<f64> {
        &self.dirs
    }

    pub fn ndir(&self) -> usize {
        self.ndir
    }

    pub fn diagnostics(&self) -> &[FitDiagnostic] {
        &self.diagnostics
    }
}

// ---- Helper methods ----

/// Weighted, uncorrected covariance of the columns of `sm` with weights `fw`.
fn kernel_matrix(sm: ArrayView2<'_, f64>, fw: &Array1<f64>) -> Array2<f64> {
    let pooled = sm.dot(fw);
    let dev = &sm - &pooled.insert_axis(Axis(1));
    let weighted = &dev * fw;
    weighted.dot(&dev.t())
}

/// Eigendecomposition of `M` with rounding-level negatives set to zero.
fn nonnegative_eigen(kernel: ArrayView2<'_, f64>) -> SirResult<(Array1<f64>, Array2<f64>)> {
    let (mut eigs, eigv) = descending_eigen(kernel)?;
    let scale = eigs.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    for (index, value) in eigs.iter_mut().enumerate() {
        if *value < 0.0 {
            if *value < -RANK_TOL * scale {
                return Err(SirError::KernelNotPositiveSemiDefinite { index, eigenvalue: *value });
            }
            *value = 0.0;
        }
    }
    Ok((eigs, eigv))
}

/// Map the leading `ndir` eigenvectors to unit directions in original space.
fn directions(
    trans: ArrayView2<'_, f64>, eigv: ArrayView2<'_, f64>, ndir: usize,
) -> (Array2<f64>, usize, Vec<FitDiagnostic>) {
    let available = eigv.ncols();
    let mut diagnostics = Vec::new();
    let ndir = if ndir > available {
        log::warn!(
            "requested {ndir} directions but only {available} eigenvectors exist; using {available}"
        );
        diagnostics.push(FitDiagnostic::DirectionsClamped { requested: ndir, available });
        available
    } else {
        ndir
    };

    let mut dirs = trans.dot(&eigv.slice(s![.., ..ndir]));
    for mut col in dirs.columns_mut() {
        let norm = col.dot(&col).sqrt();
        let pivot =
            col.iter().copied().fold(0.0_f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        if norm > 0.0 {
            col.mapv_inplace(|v| sign * v / norm);
        }
    }
    (dirs, ndir, diagnostics)
}
