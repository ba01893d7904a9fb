//! rusty-regrid – put irregular spectral traces onto a uniform grid.
//!
//! A trace is an ascending run of (abscissa, intensity) samples, as produced
//! by a spectrometer scan. This crate maps such traces onto a regular grid
//! with one of four policies and smooths stacks of resampled traces with a
//! 2-D median filter.
//!
//! ```text
//!   Trace ──┬─ nearest_bin_max ─────────────┐
//!           ├─ snapped_linear_interpolate ──┤
//!           ├─ baseline_aware_interpolate ──┼──▶ Vec<f64> (grid.count)
//!           └─ integrating_average ─────────┘
//!
//!   TraceSet ── resample_batch ──▶ Array2 (traces × grid.count) ── windowed_median ──▶ Array2
//! ```
//!
//! Picking the policy is up to the caller, either directly or through a
//! [`Method`] / [`ResamplePlan`].
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `parallelism` | Run batch partitions and median rows on the rayon pool |
//!
//! # Example
//!
//! ```
//! use rusty_regrid::{snapped_linear_interpolate, Grid, Trace};
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let y = [0.0, 10.0, 0.0, 10.0];
//! let trace = Trace::new(&x, &y)?;
//! let grid = Grid::new(0.0, 3.0, 4)?;
//! assert_eq!(snapped_linear_interpolate(&trace, &grid)?, vec![0.0, 10.0, 0.0, 10.0]);
//! # Ok::<(), rusty_regrid::ResampleError>(())
//! ```

pub mod batch;
pub mod data;
pub mod error;
pub mod locate;
pub mod median;
pub mod plan;
pub mod resample;

pub use batch::{resample_batch, resample_partitions};
pub use data::model::{Grid, Spectrum, Trace, TraceSet};
pub use error::{ResampleError, Result};
pub use locate::{find_first_at_least, find_last_at_most};
pub use median::windowed_median;
pub use plan::{Method, ResamplePlan};
pub use resample::{
    baseline_aware_interpolate, integrating_average, nearest_bin_max, snapped_linear_interpolate,
};
