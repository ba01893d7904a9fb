//! Two-dimensional sliding-window median.
//!
//! Each output cell is the median of the input values within `mrad` rows and
//! `nrad` columns of it. The window is clamped at the matrix border (no
//! padding, no wraparound), so edge and corner windows hold fewer values.

use log::debug;
use ndarray::{s, Array2, ArrayView2};
#[cfg(feature = "parallelism")]
use rayon::prelude::*;

use crate::error::{ResampleError, Result};

/// Median-filter `matrix` with a `(2·mrad+1) × (2·nrad+1)` window.
///
/// An odd-sized window yields its middle value, an even-sized one the mean
/// of the two central values. The output has the same shape as the input.
/// If the sort scratch space cannot be reserved the call fails with
/// [`ResampleError::ResourceExhausted`] before any output exists.
pub fn windowed_median(
    matrix: ArrayView2<'_, f64>,
    mrad: usize,
    nrad: usize,
) -> Result<Array2<f64>> {
    let (m, n) = matrix.dim();
    debug!("windowed_median: {m}×{n} matrix, radii ({mrad}, {nrad})");
    if m == 0 || n == 0 {
        return Ok(Array2::zeros((m, n)));
    }

    let capacity = window_capacity(m, n, mrad, nrad)?;

    #[cfg(not(feature = "parallelism"))]
    let values = {
        let mut scratch = scratch_buffer(capacity)?;
        let mut values = Vec::with_capacity(m * n);
        for i in 0..m {
            for j in 0..n {
                values.push(cell_median(&matrix, i, j, mrad, nrad, &mut scratch));
            }
        }
        values
    };

    #[cfg(feature = "parallelism")]
    let values = {
        let rows: Vec<Vec<f64>> = (0..m)
            .into_par_iter()
            .map(|i| -> Result<Vec<f64>> {
                let mut scratch = scratch_buffer(capacity)?;
                Ok((0..n)
                    .map(|j| cell_median(&matrix, i, j, mrad, nrad, &mut scratch))
                    .collect())
            })
            .collect::<Result<_>>()?;
        rows.into_iter().flatten().collect::<Vec<f64>>()
    };

    Array2::from_shape_vec((m, n), values)
        .map_err(|e| ResampleError::InvalidArgument(format!("median output shape: {e}")))
}

/// Largest window that fits inside an `m × n` matrix.
fn window_capacity(m: usize, n: usize, mrad: usize, nrad: usize) -> Result<usize> {
    let span = |rad: usize, len: usize| {
        rad.checked_mul(2)
            .and_then(|v| v.checked_add(1))
            .map_or(len, |v| v.min(len))
    };
    let rows = span(mrad, m);
    let cols = span(nrad, n);
    rows.checked_mul(cols)
        .ok_or(ResampleError::ResourceExhausted { requested: usize::MAX })
}

fn scratch_buffer(capacity: usize) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| ResampleError::ResourceExhausted { requested: capacity })?;
    Ok(buf)
}

fn cell_median(
    matrix: &ArrayView2<'_, f64>,
    i: usize,
    j: usize,
    mrad: usize,
    nrad: usize,
    scratch: &mut Vec<f64>,
) -> f64 {
    let (m, n) = matrix.dim();
    let rows = i.saturating_sub(mrad)..=i.saturating_add(mrad).min(m - 1);
    let cols = j.saturating_sub(nrad)..=j.saturating_add(nrad).min(n - 1);

    scratch.clear();
    scratch.extend(matrix.slice(s![rows, cols]).iter().copied());
    median_in_place(scratch)
}

/// Median of a non-empty buffer; reorders the buffer.
fn median_in_place(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    let k = values.len();
    if k % 2 == 1 {
        values[k / 2]
    } else {
        (values[k / 2 - 1] + values[k / 2]) / 2.0
    }
}
