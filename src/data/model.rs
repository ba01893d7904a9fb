use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{ResampleError, Result};

// ---------------------------------------------------------------------------
// Trace – a borrowed, validated x/y pair
// ---------------------------------------------------------------------------

/// An ascending sequence of (abscissa, intensity) samples.
///
/// The slices stay owned by the caller. Construction checks that both have
/// the same length and that the abscissae are finite and never decrease;
/// repeated abscissae are allowed and are merged by the resamplers.
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    x: &'a [f64],
    y: &'a [f64],
}

impl<'a> Trace<'a> {
    pub fn new(x: &'a [f64], y: &'a [f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(ResampleError::InvalidArgument(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(ResampleError::InvalidArgument(format!(
                "x[{i}] = {} is not finite",
                x[i]
            )));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] < w[0]) {
            return Err(ResampleError::InvalidArgument(format!(
                "abscissae must not decrease: x[{}] = {} follows x[{i}] = {}",
                i + 1,
                x[i + 1],
                x[i]
            )));
        }
        Ok(Trace { x, y })
    }

    /// Abscissae.
    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    /// Intensities – same length as `x`.
    pub fn y(&self) -> &'a [f64] {
        self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// First and last abscissa, or `None` for an empty trace.
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((*self.x.first()?, *self.x.last()?))
    }
}

// ---------------------------------------------------------------------------
// Spectrum – an owned x/y pair
// ---------------------------------------------------------------------------

/// A single owned spectrum, e.g. one scan collected before resampling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Abscissa axis (x).
    pub x: Vec<f64>,
    /// Intensity axis (y) – same length as `x`.
    pub y: Vec<f64>,
}

impl Spectrum {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Spectrum { x, y }
    }

    /// Borrow this spectrum as a validated [`Trace`].
    pub fn as_trace(&self) -> Result<Trace<'_>> {
        Trace::new(&self.x, &self.y)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grid – the uniform output abscissa sequence
// ---------------------------------------------------------------------------

/// Output grid `g[i] = start + i·dx` for `i in 0..count`.
///
/// `dx = (end - start) / (count - 1)` when `count > 1`, otherwise
/// `dx = end - start`. A zero `dx` is only meaningful for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Grid {
    /// Build and validate a grid descriptor.
    pub fn new(start: f64, end: f64, count: usize) -> Result<Self> {
        let grid = Grid { start, end, count };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the descriptor; every resampler calls this before touching data.
    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(ResampleError::InvalidArgument(
                "grid needs at least one cell".into(),
            ));
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ResampleError::InvalidArgument(format!(
                "grid bounds must be finite, got [{}, {}]",
                self.start, self.end
            )));
        }
        if self.end < self.start {
            return Err(ResampleError::InvalidArgument(format!(
                "grid end {} precedes start {}",
                self.end, self.start
            )));
        }
        let dx = self.dx();
        if !dx.is_finite() || (dx == 0.0 && self.count > 1) {
            return Err(ResampleError::NumericDegenerate(format!(
                "grid [{}, {}] with {} cells has spacing {dx}",
                self.start, self.end, self.count
            )));
        }
        Ok(())
    }

    /// Spacing between consecutive grid points.
    pub fn dx(&self) -> f64 {
        if self.count > 1 {
            (self.end - self.start) / (self.count - 1) as f64
        } else {
            self.end - self.start
        }
    }

    /// Single cell of zero width: `start == end`, `count == 1`.
    pub fn is_zero_width(&self) -> bool {
        self.count == 1 && self.dx() == 0.0
    }

    /// All grid abscissae, computed the same way the resamplers compute them.
    pub fn abscissae(&self) -> Vec<f64> {
        let dx = self.dx();
        (0..self.count)
            .map(|i| self.start + dx * i as f64)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TraceSet – concatenated traces addressed by an offset table
// ---------------------------------------------------------------------------

/// Several traces stored back to back, partitioned by `offsets`.
///
/// Partition `k` spans `offsets[k]..offsets[k + 1]`; the last one runs to
/// the end of the arrays. Points before `offsets[0]` belong to no partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSet {
    x: Vec<f64>,
    y: Vec<f64>,
    offsets: Vec<usize>,
}

impl TraceSet {
    pub fn from_parts(x: Vec<f64>, y: Vec<f64>, offsets: Vec<usize>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(ResampleError::InvalidArgument(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        validate_offsets(&offsets, x.len())?;
        Ok(TraceSet { x, y, offsets })
    }

    /// Concatenate owned spectra, recording where each one starts.
    pub fn from_spectra(spectra: Vec<Spectrum>) -> Result<Self> {
        let total: usize = spectra.iter().map(Spectrum::len).sum();
        let mut x = Vec::with_capacity(total);
        let mut y = Vec::with_capacity(total);
        let mut offsets = Vec::with_capacity(spectra.len());

        for (i, sp) in spectra.into_iter().enumerate() {
            if sp.x.len() != sp.y.len() {
                return Err(ResampleError::InvalidArgument(format!(
                    "spectrum {i}: x has {} values but y has {}",
                    sp.x.len(),
                    sp.y.len()
                )));
            }
            offsets.push(x.len());
            x.extend(sp.x);
            y.extend(sp.y);
        }
        Ok(TraceSet { x, y, offsets })
    }

    /// Number of partitions.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Index range of partition `k`.
    pub fn bounds(&self, k: usize) -> Option<Range<usize>> {
        let start = *self.offsets.get(k)?;
        let end = self.offsets.get(k + 1).copied().unwrap_or(self.x.len());
        Some(start..end)
    }

    /// Partition `k` as a validated [`Trace`].
    pub fn trace(&self, k: usize) -> Result<Trace<'_>> {
        let range = self.bounds(k).ok_or_else(|| {
            ResampleError::InvalidArgument(format!(
                "partition {k} out of range ({} partitions)",
                self.len()
            ))
        })?;
        Trace::new(&self.x[range.clone()], &self.y[range])
    }
}

/// Offsets must be non-decreasing and lie within `0..=len`.
pub(crate) fn validate_offsets(offsets: &[usize], len: usize) -> Result<()> {
    if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(ResampleError::InvalidArgument(format!(
            "offset table must not decrease: offsets[{}] = {} follows {}",
            i + 1,
            offsets[i + 1],
            offsets[i]
        )));
    }
    if let Some(&last) = offsets.last() {
        if last > len {
            return Err(ResampleError::InvalidArgument(format!(
                "offset {last} lies beyond the {len} concatenated points"
            )));
        }
    }
    Ok(())
}

/// Index ranges described by an already validated offset table.
pub(crate) fn partition_ranges(offsets: &[usize], len: usize) -> Vec<Range<usize>> {
    offsets
        .iter()
        .enumerate()
        .map(|(k, &start)| start..offsets.get(k + 1).copied().unwrap_or(len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spacing_follows_cell_count() {
        let grid = Grid::new(0.0, 3.0, 4).unwrap();
        assert_eq!(grid.dx(), 1.0);
        assert_eq!(grid.abscissae(), vec![0.0, 1.0, 2.0, 3.0]);

        let single = Grid::new(2.0, 5.0, 1).unwrap();
        assert_eq!(single.dx(), 3.0);
        assert!(!single.is_zero_width());
        assert!(Grid::new(2.0, 2.0, 1).unwrap().is_zero_width());
    }

    #[test]
    fn grid_rejects_bad_descriptors() {
        assert!(matches!(
            Grid::new(0.0, 1.0, 0),
            Err(ResampleError::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::new(1.0, 0.0, 5),
            Err(ResampleError::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::new(f64::NAN, 1.0, 5),
            Err(ResampleError::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::new(1.0, 1.0, 5),
            Err(ResampleError::NumericDegenerate(_))
        ));
    }

    #[test]
    fn trace_accepts_ties_but_not_descent() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [0.0; 4];
        assert_eq!(Trace::new(&x, &y).unwrap().len(), 4);

        let err = Trace::new(&[1.0, 3.0, 2.0], &[0.0; 3]).unwrap_err();
        assert!(err.to_string().contains("x[2]"));

        assert!(Trace::new(&[1.0, f64::NAN], &[0.0; 2]).is_err());
        assert!(Trace::new(&[1.0, 2.0], &[0.0]).is_err());
    }

    #[test]
    fn trace_set_partitions_by_offsets() {
        let set = TraceSet::from_spectra(vec![
            Spectrum::new(vec![1.0, 2.0], vec![5.0, 6.0]),
            Spectrum::default(),
            Spectrum::new(vec![0.5, 1.5, 2.5], vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();

        assert_eq!(set.offsets(), &[0, 2, 2]);
        assert_eq!(set.bounds(0), Some(0..2));
        assert_eq!(set.bounds(1), Some(2..2));
        assert_eq!(set.bounds(2), Some(2..5));
        assert!(set.trace(1).unwrap().is_empty());
        assert_eq!(set.trace(2).unwrap().y(), &[1.0, 2.0, 3.0]);
        assert!(set.trace(3).is_err());
    }

    #[test]
    fn offsets_must_be_ordered_and_in_bounds() {
        assert!(TraceSet::from_parts(vec![0.0; 4], vec![0.0; 4], vec![0, 3, 1]).is_err());
        assert!(TraceSet::from_parts(vec![0.0; 4], vec![0.0; 4], vec![0, 5]).is_err());
        assert!(TraceSet::from_parts(vec![0.0; 4], vec![0.0; 4], vec![1, 4]).is_ok());
        assert_eq!(partition_ranges(&[1, 4], 4), vec![1..4, 4..4]);
    }
}
