//! sir::slicing — partition a sorted response into tie-respecting slices.
//!
//! Purpose
//! -------
//! Split the sorted response into contiguous slices of roughly equal size,
//! targeting a requested slice count, without ever splitting a group of tied
//! response values across two slices. The slice structure drives the slice
//! means, the kernel matrix, and both inferential procedures.
//!
//! Key behaviors
//! -------------
//! - [`locate_distinct_boundaries`]: one slice per distinct value; used when
//!   the number of distinct values does not exceed the request.
//! - [`bucket_distinct_values`]: greedy merge of consecutive distinct-value
//!   groups into buckets of about `⌊n / nslice⌋` observations.
//! - [`slicer`]: chooses between the two and logs when fewer slices than
//!   requested could be formed.
//! - [`slice_assignments`] and [`slice_weights`] expand boundaries into
//!   per-observation labels and per-slice occupancy fractions.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y` is sorted ascending and finite (checked upstream by
//!   `sir::validation`).
//! - Boundaries are 0-based and half-open: `bd[0] = 0`, `bd[h] = n`, slice `s`
//!   covers rows `bd[s]..bd[s+1]`, and `bd` is strictly increasing.
//! - The realized slice count `bd.len() − 1` never exceeds the request.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the one-slice-per-value path, bucketing with and without
//!   ties, the short-tail stop rule, and the weight/assignment expansions.
use crate::sir::errors::{SirError, SirResult};
use ndarray::Array1;

/// Fewer remaining observations than this end the bucketing walk; the last
/// bucket then absorbs them.
pub const MIN_TAIL: usize = 3;

/// Distinct values of a sorted sequence, in ascending order.
pub fn distinct_values(y: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = Vec::new();
    for &v in y {
        if values.last() != Some(&v) {
            values.push(v);
        }
    }
    values
}

/// Starting row of each distinct value, followed by the sentinel `n`.
///
/// Each distinct value becomes its own slice. Uses a binary search per value.
pub fn locate_distinct_boundaries(y: &[f64], distinct: &[f64]) -> Vec<usize> {
    let mut bd: Vec<usize> = distinct.iter().map(|&v| y.partition_point(|&t| t < v)).collect();
    bd.push(y.len());
    bd
}

/// bucket_distinct_values — greedy tie-respecting buckets of nominal size.
///
/// Parameters
/// ----------
/// - `y`: `&[f64]`
///   Sorted response of length `n`.
/// - `distinct`: `&[f64]`
///   Distinct values of `y` in ascending order.
/// - `nslice`: `usize`
///   Requested number of slices (≥ 1).
///
/// Returns
/// -------
/// `Vec<usize>`
///   Boundaries `[0, …, n]` with at most `nslice` slices.
///
/// Notes
/// -----
/// - `cum[k]` is the number of observations `≤ distinct[k]`; only these counts
///   are admissible boundaries, so tie groups are never split.
/// - Each step targets `last + ⌊n / nslice⌋` and snaps to the first admissible
///   boundary at or after the target.
/// - The walk stops when fewer than [`MIN_TAIL`] observations would remain,
///   when the snapped boundary reaches `n`, or once `nslice − 1` interior
///   boundaries exist. The sentinel `n` then closes the final bucket, which
///   can be larger than nominal.
pub fn bucket_distinct_values(y: &[f64], distinct: &[f64], nslice: usize) -> Vec<usize> {
    let n = y.len();
    let nominal = (n / nslice.max(1)).max(1);
    let cum: Vec<usize> = distinct.iter().map(|&v| y.partition_point(|&t| t <= v)).collect();

    let mut bd = vec![0];
    let mut last = 0;
    while bd.len() < nslice {
        let target = last + nominal;
        let k = cum.partition_point(|&c| c < target);
        let Some(&edge) = cum.get(k) else { break };
        if n - edge < MIN_TAIL {
            break;
        }
        bd.push(edge);
        last = edge;
    }
    bd.push(n);
    bd
}

/// slicer — slice boundaries for a sorted response.
///
/// Parameters
/// ----------
/// - `y`: `&[f64]`
///   Sorted, finite response.
/// - `nslice`: `usize`
///   Requested slice count; must be at least 1.
///
/// Returns
/// -------
/// `SirResult<Vec<usize>>`
///   Strictly increasing boundaries `[0, …, n]`. When `y` has at most `nslice`
///   distinct values each value gets its own slice; otherwise values are
///   bucketed by [`bucket_distinct_values`].
///
/// Errors
/// ------
/// - `SirError::EmptyResponse` for empty `y`.
/// - `SirError::InvalidSliceCount` when `nslice == 0`.
pub fn slicer(y: &[f64], nslice: usize) -> SirResult<Vec<usize>> {
    if y.is_empty() {
        return Err(SirError::EmptyResponse);
    }
    if nslice == 0 {
        return Err(SirError::InvalidSliceCount { nslice });
    }

    let distinct = distinct_values(y);
    let bd = if distinct.len() <= nslice {
        locate_distinct_boundaries(y, &distinct)
    } else {
        bucket_distinct_values(y, &distinct, nslice)
    };

    let realized = bd.len() - 1;
    if realized < nslice {
        log::debug!("slicer formed {realized} slices out of {nslice} requested");
    }
    Ok(bd)
}

/// Slice label (0-based) for every observation.
pub fn slice_assignments(bd: &[usize]) -> Vec<usize> {
    bd.windows(2).enumerate().flat_map(|(s, w)| std::iter::repeat_n(s, w[1] - w[0])).collect()
}

/// Fraction of observations in each slice; sums to one.
pub fn slice_weights(bd: &[usize]) -> Array1<f64> {
    let n = bd.last().copied().unwrap_or(0).max(1) as f64;
    Array1::from_iter(bd.windows(2).map(|w| (w[1] - w[0]) as f64 / n))
}
