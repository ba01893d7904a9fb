//! Single-trace resamplers.
//!
//! Each one maps a [`Trace`] onto a [`Grid`](crate::data::model::Grid) and
//! returns exactly `grid.count` values. They differ in what they preserve:
//!
//! | Resampler | Keeps |
//! |---|---|
//! | [`nearest_bin_max`] | peak heights |
//! | [`snapped_linear_interpolate`] | peak heights, with straight lines in between |
//! | [`baseline_aware_interpolate`] | peak heights, resting at a baseline across wide gaps |
//! | [`integrating_average`] | the integral of the signal |

pub mod baseline;
pub mod integrate;
pub mod nearest;
pub mod snapped;

pub use baseline::baseline_aware_interpolate;
pub use integrate::integrating_average;
pub use nearest::nearest_bin_max;
pub use snapped::snapped_linear_interpolate;

use crate::data::model::Trace;
use crate::locate::find_first_at_least;

/// Value of the piecewise-linear curve through `trace` at `x`, `None` outside
/// its span. Samples sitting exactly on `x` are merged by maximum.
///
/// Only used for zero-width grids, where every policy degenerates to a
/// point evaluation.
pub(crate) fn value_at(trace: &Trace<'_>, x: f64) -> Option<f64> {
    let (first, last) = trace.span()?;
    if x < first || x > last {
        return None;
    }
    let xs = trace.x();
    let ys = trace.y();
    let j = find_first_at_least(xs, x);
    if xs[j] == x {
        let hits = xs[j..].iter().take_while(|&&v| v == x).count();
        return ys[j..j + hits].iter().copied().reduce(f64::max);
    }
    // x > first, so j >= 1 and xs[j - 1] < x < xs[j].
    Some(ys[j - 1] + (x - xs[j - 1]) * (ys[j] - ys[j - 1]) / (xs[j] - xs[j - 1]))
}
