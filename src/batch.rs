//! Batch dispatch over concatenated traces.
//!
//! A batch is one x/y pair holding several traces back to back plus an
//! offset table marking where each starts. Every partition is resampled on
//! its own with the same grid and method; partition `k` becomes row `k` of
//! the output matrix, identical to a direct single-trace call.

use std::ops::Range;

use log::{debug, trace};
use ndarray::Array2;
#[cfg(feature = "parallelism")]
use rayon::prelude::*;

use crate::data::model::{partition_ranges, validate_offsets, Grid, Trace, TraceSet};
use crate::error::{ResampleError, Result};
use crate::plan::Method;

/// Resample every trace of `set`; the result has shape `(set.len(), grid.count)`.
pub fn resample_batch(set: &TraceSet, grid: &Grid, method: &Method) -> Result<Array2<f64>> {
    resample_partitions(set.x(), set.y(), set.offsets(), grid, method)
}

/// Flat-array form of [`resample_batch`].
///
/// Partition `k` spans `offsets[k]..offsets[k + 1]`, the last one runs to the
/// end of `x`. Offsets must be non-decreasing and at most `x.len()`.
pub fn resample_partitions(
    x: &[f64],
    y: &[f64],
    offsets: &[usize],
    grid: &Grid,
    method: &Method,
) -> Result<Array2<f64>> {
    if x.len() != y.len() {
        return Err(ResampleError::InvalidArgument(format!(
            "x has {} values but y has {}",
            x.len(),
            y.len()
        )));
    }
    validate_offsets(offsets, x.len())?;
    grid.validate()?;
    method.validate()?;

    let ranges = partition_ranges(offsets, x.len());
    debug!(
        "resample_partitions: {} partitions, {} points, {} cells, {method:?}",
        ranges.len(),
        x.len(),
        grid.count
    );

    #[cfg(not(feature = "parallelism"))]
    let rows = ranges
        .iter()
        .enumerate()
        .map(|(k, range)| resample_partition(x, y, k, range.clone(), grid, method))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(feature = "parallelism")]
    let rows = ranges
        .par_iter()
        .enumerate()
        .map(|(k, range)| resample_partition(x, y, k, range.clone(), grid, method))
        .collect::<Result<Vec<_>>>()?;

    let values: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((ranges.len(), grid.count), values)
        .map_err(|e| ResampleError::InvalidArgument(format!("batch output shape: {e}")))
}

fn resample_partition(
    x: &[f64],
    y: &[f64],
    k: usize,
    range: Range<usize>,
    grid: &Grid,
    method: &Method,
) -> Result<Vec<f64>> {
    trace!("partition {k}: points {range:?}");
    let part = Trace::new(&x[range.clone()], &y[range]).map_err(|e| match e {
        ResampleError::InvalidArgument(msg) => {
            ResampleError::InvalidArgument(format!("partition {k}: {msg}"))
        }
        other => other,
    })?;
    method.apply(&part, grid)
}
