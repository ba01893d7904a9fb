use log::debug;

use crate::data::model::{Grid, Trace};
use crate::error::{ResampleError, Result};
use crate::locate::find_last_at_most;
use crate::resample::value_at;

// ---------------------------------------------------------------------------
// Anchor state
// ---------------------------------------------------------------------------

/// A run of samples rounded into the same grid cell, holding their maximum.
///
/// `cell` may be negative when the anchor lies left of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinAnchor {
    pub cell: i64,
    pub y: f64,
}

/// Forward sweep over cell-rounded anchors.
///
/// Invariant while sweeping cell `i`: `pre.cell <= i < post.cell`. Either
/// side is `None` when no such anchor exists.
#[derive(Debug, Clone)]
pub struct BinAnchors<'t> {
    trace: Trace<'t>,
    start: f64,
    dx: f64,
    /// First sample not yet folded into an anchor.
    next: usize,
    pub pre: Option<BinAnchor>,
    pub post: Option<BinAnchor>,
}

impl<'t> BinAnchors<'t> {
    /// Seed `post` with the cell holding the last sample at or before the
    /// first cell's right edge, merged with every sample sharing that cell.
    pub fn new(trace: Trace<'t>, grid: &Grid) -> Self {
        let mut anchors = BinAnchors {
            trace,
            start: grid.start,
            dx: grid.dx(),
            next: trace.len(),
            pre: None,
            post: None,
        };
        if trace.is_empty() {
            return anchors;
        }

        let xs = trace.x();
        let ys = trace.y();
        let seed = find_last_at_most(xs, grid.start + 0.5 * anchors.dx);
        let cell = anchors.cell_of(xs[seed]);

        let mut y = ys[seed];
        for k in (0..seed).rev() {
            if anchors.cell_of(xs[k]) != cell {
                break;
            }
            y = y.max(ys[k]);
        }
        let mut next = seed + 1;
        while next < xs.len() && anchors.cell_of(xs[next]) == cell {
            y = y.max(ys[next]);
            next += 1;
        }

        anchors.next = next;
        anchors.post = Some(BinAnchor { cell, y });
        anchors
    }

    fn cell_of(&self, x: f64) -> i64 {
        ((x - self.start) / self.dx).round() as i64
    }

    fn take_anchor(&mut self) -> Option<BinAnchor> {
        let xs = self.trace.x();
        let ys = self.trace.y();
        if self.next >= xs.len() {
            return None;
        }
        let cell = self.cell_of(xs[self.next]);
        let mut y = ys[self.next];
        self.next += 1;
        while self.next < xs.len() && self.cell_of(xs[self.next]) == cell {
            y = y.max(ys[self.next]);
            self.next += 1;
        }
        Some(BinAnchor { cell, y })
    }

    /// Promote `post` to `pre` while it sits at or left of cell `i`.
    pub fn advance_to(&mut self, i: i64) {
        while let Some(post) = self.post.filter(|p| p.cell <= i) {
            self.pre = Some(post);
            self.post = self.take_anchor();
        }
    }

    /// Output for cell `i` given the current anchors.
    ///
    /// Anchors at most `2·reach + 1` cells apart are joined by a straight
    /// line. Otherwise the value ramps from `pre` down to `baselevel` over
    /// `reach + 1` cells, rests there, and ramps back up to `post`.
    pub fn value_at(&self, i: i64, baselevel: f64, reach: i64) -> f64 {
        let span = reach.saturating_add(1) as f64;
        match (self.pre, self.post) {
            (Some(pre), _) if pre.cell == i => pre.y,
            (Some(pre), Some(post))
                if post.cell.saturating_sub(pre.cell)
                    <= reach.saturating_mul(2).saturating_add(1) =>
            {
                let width = post.cell as f64 - pre.cell as f64;
                pre.y + (post.y - pre.y) / width * (i as f64 - pre.cell as f64)
            }
            (Some(pre), post)
                if i.saturating_sub(pre.cell) <= reach
                    && post.map_or(true, |p| p.cell.saturating_sub(i) > reach) =>
            {
                pre.y + (baselevel - pre.y) / span * (i as f64 - pre.cell as f64)
            }
            (pre, Some(post))
                if pre.map_or(true, |p| i.saturating_sub(p.cell) > reach)
                    && post.cell.saturating_sub(i) <= reach =>
            {
                let into_ramp = i as f64 - post.cell as f64 + span;
                baselevel + (post.y - baselevel) / span * into_ramp
            }
            _ => baselevel,
        }
    }
}

// ---------------------------------------------------------------------------
// Resampler
// ---------------------------------------------------------------------------

/// Baseline-aware snapped linear interpolation.
///
/// Like [`snapped_linear_interpolate`](super::snapped_linear_interpolate), but
/// wide gaps between samples are not bridged: the output falls back to
/// `baselevel` over `reach = floor(basespace / dx)` cells on either side of a
/// sample and stays there until the next one.
pub fn baseline_aware_interpolate(
    trace: &Trace<'_>,
    grid: &Grid,
    baselevel: f64,
    basespace: f64,
) -> Result<Vec<f64>> {
    grid.validate()?;
    check_parameters(baselevel, basespace)?;
    debug!(
        "baseline_aware_interpolate: {} points onto {} cells, baselevel {baselevel}, basespace {basespace}",
        trace.len(),
        grid.count
    );

    if trace.is_empty() {
        return Ok(vec![baselevel; grid.count]);
    }
    if grid.is_zero_width() {
        return Ok(vec![value_at(trace, grid.start).unwrap_or(baselevel)]);
    }

    let reach = (basespace / grid.dx()).floor() as i64;
    let mut anchors = BinAnchors::new(*trace, grid);
    let mut out = Vec::with_capacity(grid.count);
    for i in 0..grid.count as i64 {
        anchors.advance_to(i);
        out.push(anchors.value_at(i, baselevel, reach));
    }
    Ok(out)
}

/// `baselevel` and `basespace` must be finite and `basespace` non-negative.
pub(crate) fn check_parameters(baselevel: f64, basespace: f64) -> Result<()> {
    if !baselevel.is_finite() || !basespace.is_finite() {
        return Err(ResampleError::NumericDegenerate(format!(
            "baseline parameters must be finite, got baselevel {baselevel}, basespace {basespace}"
        )));
    }
    if basespace < 0.0 {
        return Err(ResampleError::NumericDegenerate(format!(
            "basespace {basespace} gives a negative reach"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn run(x: &[f64], y: &[f64], grid: Grid, baselevel: f64, basespace: f64) -> Vec<f64> {
        baseline_aware_interpolate(&Trace::new(x, y).unwrap(), &grid, baselevel, basespace)
            .unwrap()
    }

    #[test]
    fn wide_gap_rests_at_baseline() {
        let grid = Grid::new(0.0, 20.0, 21).unwrap();
        let out = run(&[5.0, 15.0], &[10.0, 20.0], grid, 0.0, 2.0);

        assert_eq!(&out[..3], &[0.0; 3]);
        assert_abs_diff_eq!(out[3], 10.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[4], 20.0 / 3.0, epsilon = 1e-12);
        assert_eq!(out[5], 10.0);
        assert_abs_diff_eq!(out[6], 20.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[7], 10.0 / 3.0, epsilon = 1e-12);
        assert_eq!(&out[8..13], &[0.0; 5]);
        assert_abs_diff_eq!(out[13], 20.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[14], 40.0 / 3.0, epsilon = 1e-12);
        assert_eq!(out[15], 20.0);
        assert_abs_diff_eq!(out[16], 40.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[17], 20.0 / 3.0, epsilon = 1e-12);
        assert_eq!(&out[18..], &[0.0; 3]);
    }

    #[test]
    fn close_samples_are_joined_directly() {
        let grid = Grid::new(0.0, 10.0, 11).unwrap();
        let out = run(&[5.0, 8.0], &[10.0, 20.0], grid, 0.0, 2.0);
        assert_eq!(out[5], 10.0);
        assert_abs_diff_eq!(out[6], 10.0 + 10.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[7], 10.0 + 20.0 / 3.0, epsilon = 1e-12);
        assert_eq!(out[8], 20.0);
    }

    #[test]
    fn samples_left_of_the_grid_seed_the_first_ramp() {
        let grid = Grid::new(0.0, 4.0, 5).unwrap();
        let out = run(&[-1.0, 3.0], &[6.0, 2.0], grid, 0.0, 1.0);
        assert_eq!(out, vec![3.0, 0.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn extreme_cells_and_reach_stay_finite() {
        let grid = Grid::new(0.0, 1.0, 11).unwrap();

        let out = run(&[-1e300, 0.5], &[1.0, 2.0], grid, 0.0, 1e300);
        assert_eq!(out[5], 2.0);
        for v in &out {
            assert_abs_diff_eq!(*v, 2.0, epsilon = 1e-9);
        }

        let out = run(&[0.5, 1e300], &[2.0, 1.0], grid, 0.0, 1e300);
        assert_eq!(out[5], 2.0);
        for v in &out {
            assert_abs_diff_eq!(*v, 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn minus_one_is_an_ordinary_intensity() {
        let grid = Grid::new(0.0, 6.0, 7).unwrap();
        let out = run(&[2.0, 4.0], &[-1.0, -1.0], grid, 0.0, 1.0);
        assert_eq!(&out[2..5], &[-1.0; 3]);
    }

    #[test]
    fn colliding_samples_merge_by_maximum() {
        let grid = Grid::new(0.0, 4.0, 5).unwrap();
        let out = run(&[1.8, 2.0, 2.2], &[1.0, 3.0, 9.0], grid, 0.5, 0.0);
        assert_eq!(out, vec![0.5, 0.5, 9.0, 0.5, 0.5]);
    }

    #[test]
    fn rejects_negative_reach() {
        let trace = Trace::new(&[1.0], &[1.0]).unwrap();
        let grid = Grid::new(0.0, 2.0, 3).unwrap();
        assert!(matches!(
            baseline_aware_interpolate(&trace, &grid, 0.0, -1.0),
            Err(ResampleError::NumericDegenerate(_))
        ));
    }

    #[test]
    fn empty_trace_is_all_baseline() {
        let grid = Grid::new(0.0, 1.0, 3).unwrap();
        assert_eq!(run(&[], &[], grid, 2.5, 1.0), vec![2.5; 3]);
    }
}
