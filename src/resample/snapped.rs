use log::debug;

use crate::data::model::{Grid, Trace};
use crate::error::Result;
use crate::locate::find_last_at_most;
use crate::resample::value_at;

/// How far left of the grid (in cells) the first anchor is searched for.
const SEED_MARGIN_CELLS: f64 = 20.0;

// ---------------------------------------------------------------------------
// Anchor state
// ---------------------------------------------------------------------------

/// A sample (or run of samples) snapped onto a grid position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// Forward sweep over the anchors of one trace.
///
/// `post` is the first anchor at or right of the current grid point (or the
/// last anchor once samples run out) and `pre` the one before it. Samples
/// that snap to the same position are folded into one anchor holding their
/// maximum intensity.
#[derive(Debug, Clone)]
pub struct SnapSweep<'t> {
    trace: Trace<'t>,
    start: f64,
    dx: f64,
    /// First sample not yet folded into an anchor.
    next: usize,
    pub pre: Option<Anchor>,
    pub post: Anchor,
}

impl<'t> SnapSweep<'t> {
    /// Seed the sweep at the last sample at or before `start - 20·dx`.
    /// Returns `None` for an empty trace.
    pub fn new(trace: Trace<'t>, grid: &Grid) -> Option<Self> {
        if trace.is_empty() {
            return None;
        }
        let dx = grid.dx();
        let seed = find_last_at_most(trace.x(), grid.start - SEED_MARGIN_CELLS * dx);
        let mut sweep = SnapSweep {
            trace,
            start: grid.start,
            dx,
            next: seed,
            pre: None,
            post: Anchor { x: 0.0, y: 0.0 },
        };
        sweep.post = sweep.take_anchor();
        Some(sweep)
    }

    fn snap(&self, x: f64) -> f64 {
        self.start + self.dx * ((x - self.start) / self.dx).round()
    }

    /// Fold the run of samples starting at `next` that share a snapped
    /// position. Requires `next < trace.len()`.
    fn take_anchor(&mut self) -> Anchor {
        let xs = self.trace.x();
        let ys = self.trace.y();
        let x = self.snap(xs[self.next]);
        let mut y = ys[self.next];
        self.next += 1;
        while self.next < xs.len() && self.snap(xs[self.next]) == x {
            y = y.max(ys[self.next]);
            self.next += 1;
        }
        Anchor { x, y }
    }

    /// Move forward until `post` is at or right of `xi`, or no samples are left.
    pub fn advance_to(&mut self, xi: f64) {
        while xi > self.post.x && self.next < self.trace.len() {
            self.pre = Some(self.post);
            self.post = self.take_anchor();
        }
    }

    /// Straight line through `pre` and `post`, evaluated at `xi`.
    ///
    /// Without a `pre` anchor only a grid point sitting on `post` has a
    /// value; anything else reads as `0`.
    pub fn value_at(&self, xi: f64) -> f64 {
        match self.pre {
            Some(pre) => {
                pre.y + (xi - pre.x) * (self.post.y - pre.y) / (self.post.x - pre.x)
            }
            None if xi == self.post.x => self.post.y,
            None => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Resampler
// ---------------------------------------------------------------------------

/// Snapped linear interpolation.
///
/// Sample abscissae are snapped to the nearest grid position, colliding
/// samples keep their maximum, and the grid is filled by straight lines
/// between consecutive anchors. Grid points outside `[x[0], x[n-1]]` are `0`.
pub fn snapped_linear_interpolate(trace: &Trace<'_>, grid: &Grid) -> Result<Vec<f64>> {
    grid.validate()?;
    debug!(
        "snapped_linear_interpolate: {} points onto {} cells",
        trace.len(),
        grid.count
    );

    let Some((first, last)) = trace.span() else {
        return Ok(vec![0.0; grid.count]);
    };
    if grid.is_zero_width() {
        return Ok(vec![value_at(trace, grid.start).unwrap_or(0.0)]);
    }
    let Some(mut sweep) = SnapSweep::new(*trace, grid) else {
        return Ok(vec![0.0; grid.count]);
    };

    let dx = grid.dx();
    let mut out = Vec::with_capacity(grid.count);
    for i in 0..grid.count {
        let xi = grid.start + dx * i as f64;
        if xi < first || xi > last {
            out.push(0.0);
            continue;
        }
        sweep.advance_to(xi);
        out.push(sweep.value_at(xi));
    }
    Ok(out)
}
