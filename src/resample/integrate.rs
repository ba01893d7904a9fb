use log::debug;

use crate::data::model::{Grid, Trace};
use crate::error::Result;
use crate::locate::find_last_at_most;
use crate::resample::value_at;

/// Forward-only pointer into the segments `x[j]..x[j+1]` of a trace.
///
/// A segment straddling a cell boundary is visited by both cells, but `j`
/// never moves backwards.
#[derive(Debug, Clone)]
pub struct SegmentCursor<'t> {
    trace: Trace<'t>,
    pub j: usize,
}

impl<'t> SegmentCursor<'t> {
    /// Start at the last sample at or before `x`.
    pub fn new(trace: Trace<'t>, x: f64) -> Self {
        let j = find_last_at_most(trace.x(), x);
        SegmentCursor { trace, j }
    }

    /// Trapezoid area of the trace clipped to `[x1, x2]`, leaving the cursor on
    /// the segment that reaches past `x2`.
    pub fn area_between(&mut self, x1: f64, x2: f64) -> f64 {
        let xs = self.trace.x();
        let ys = self.trace.y();
        let n = xs.len();
        let mut area = 0.0;
        let mut through = false;

        while self.j + 1 < n && (!through || xs[self.j + 1] <= x2) {
            let j = self.j;
            if xs[j + 1] > x2 || j + 2 >= n {
                through = true;
            }
            if xs[j + 1] <= x1 {
                self.j += 1;
                continue;
            }

            let (xb, yb) = if xs[j] < x1 {
                (x1, self.segment_value(x1))
            } else {
                (xs[j], ys[j])
            };
            let (xe, ye) = if xs[j + 1] > x2 {
                (x2, self.segment_value(x2))
            } else {
                (xs[j + 1], ys[j + 1])
            };
            area += (ye + yb) * (xe - xb) / 2.0;

            if xs[j + 1] <= x2 {
                self.j += 1;
            }
        }
        area
    }

    /// Linear value on the current segment. Only called with
    /// `x[j] < x < x[j+1]`, so the segment has non-zero width.
    fn segment_value(&self, x: f64) -> f64 {
        let xs = self.trace.x();
        let ys = self.trace.y();
        let j = self.j;
        ys[j] + (ys[j + 1] - ys[j]) * (x - xs[j]) / (xs[j + 1] - xs[j])
    }
}

/// Bin-integrated linear average.
///
/// Cell `i` covers `[start + (i - 0.5)·dx, start + (i + 0.5)·dx]`; its output
/// is the area under the piecewise-linear trace over that interval divided by
/// `dx`. Summing the output times `dx` therefore conserves the integral of
/// the signal. Cells that do not overlap `[x[0], x[n-1]]` are `0`.
pub fn integrating_average(trace: &Trace<'_>, grid: &Grid) -> Result<Vec<f64>> {
    grid.validate()?;
    debug!(
        "integrating_average: {} points onto {} cells",
        trace.len(),
        grid.count
    );

    let Some((first, last)) = trace.span() else {
        return Ok(vec![0.0; grid.count]);
    };
    if grid.is_zero_width() {
        return Ok(vec![value_at(trace, grid.start).unwrap_or(0.0)]);
    }

    let dx = grid.dx();
    let mut cursor = SegmentCursor::new(*trace, grid.start - dx);
    let mut out = Vec::with_capacity(grid.count);
    let mut x2 = grid.start - 0.5 * dx;
    for i in 0..grid.count {
        let x1 = x2;
        x2 = grid.start + dx * (i as f64 + 0.5);
        if x2 <= first || x1 >= last {
            out.push(0.0);
            continue;
        }
        out.push(cursor.area_between(x1, x2) / dx);
    }
    Ok(out)
}
