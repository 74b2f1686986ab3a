//! sir::slice_means — per-slice means of whitened predictors.
//!
//! For whitened data `Z` (`n×p`) and boundaries `bd`, column `s` of the
//! returned `p×h` matrix is the mean of rows `bd[s]..bd[s+1]`. The companion
//! weights are the slice occupancy fractions from `slicing::slice_weights`.
use crate::sir::slicing::slice_weights;
use ndarray::{Array1, Array2, ArrayView2, Axis, s};

/// slice_means — slice means as columns, plus occupancy weights.
///
/// Parameters
/// ----------
/// - `z`: `ArrayView2<f64>`
///   `n×p` whitened predictors in sorted-response order.
/// - `bd`: `&[usize]`
///   Strictly increasing boundaries with `bd[0] = 0` and `bd[h] = n`.
///
/// Returns
/// -------
/// `(Array2<f64>, Array1<f64>)`
///   `sm` of shape `p×h` and `fw` of length `h`.
///
/// Panics
/// ------
/// - If `bd` indexes past `z.nrows()`. Boundaries produced by
///   `slicing::slicer` on a response aligned with `z` never do.
pub fn slice_means(z: ArrayView2<'_, f64>, bd: &[usize]) -> (Array2<f64>, Array1<f64>) {
    let h = bd.len().saturating_sub(1);
    let mut sm = Array2::<f64>::zeros((z.ncols(), h));
    for (col, w) in bd.windows(2).enumerate() {
        let count = (w[1] - w[0]) as f64;
        let mean = z.slice(s![w[0]..w[1], ..]).sum_axis(Axis(0)) / count;
        sm.column_mut(col).assign(&mean);
    }
    (sm, slice_weights(bd))
}
