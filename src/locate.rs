//! Binary-search seeds for the resampler sweeps.
//!
//! Both searches run over ascending abscissae in `O(log n)`. With repeated
//! abscissae either matching index may come back; the result only seeds a
//! forward sweep.

/// Greatest `i` with `xs[i] <= query`.
///
/// Clamps to `0` when `query < xs[0]` (and for an empty slice), so callers
/// that search from a margin left of the grid still start at the first
/// sample.
pub fn find_last_at_most(xs: &[f64], query: f64) -> usize {
    xs.partition_point(|&v| v <= query).saturating_sub(1)
}

/// Smallest `i` with `xs[i] >= query`, or `xs.len()` if every value is
/// smaller.
pub fn find_first_at_least(xs: &[f64], query: f64) -> usize {
    xs.partition_point(|&v| v < query)
}
