use log::debug;

use crate::data::model::{Grid, Trace};
use crate::error::Result;
use crate::locate::find_first_at_least;

/// Nearest-bin maximum.
///
/// Every sample within one cell of the grid is dropped into the cell whose
/// centre is nearest (`floor((x - start) / dx + 0.5)`), and each cell keeps
/// the largest intensity it receives. Cells nobody lands in, and cells whose
/// samples are all negative, stay at `0`.
pub fn nearest_bin_max(trace: &Trace<'_>, grid: &Grid) -> Result<Vec<f64>> {
    grid.validate()?;
    debug!(
        "nearest_bin_max: {} points onto {} cells",
        trace.len(),
        grid.count
    );

    let dx = grid.dx();
    let mut out = vec![0.0; grid.count];
    let xs = trace.x();
    let ys = trace.y();

    let lower = grid.start - dx;
    let upper = grid.end + dx;
    let first = find_first_at_least(xs, lower);

    for (&x, &y) in xs[first..].iter().zip(&ys[first..]) {
        if x > upper {
            break;
        }
        if let Some(bin) = nearest_bin(grid, dx, x) {
            if out[bin] < y {
                out[bin] = y;
            }
        }
    }
    Ok(out)
}

fn nearest_bin(grid: &Grid, dx: f64, x: f64) -> Option<usize> {
    if dx == 0.0 {
        return (x == grid.start).then_some(0);
    }
    let bin = ((x - grid.start) / dx + 0.5).floor();
    (bin >= 0.0 && bin < grid.count as f64).then_some(bin as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(x: &[f64], y: &[f64], grid: Grid) -> Vec<f64> {
        nearest_bin_max(&Trace::new(x, y).unwrap(), &grid).unwrap()
    }

    #[test]
    fn keeps_the_largest_sample_per_cell() {
        let grid = Grid::new(0.0, 4.0, 5).unwrap();
        let out = run(
            &[0.1, 0.9, 1.2, 1.4, 3.0],
            &[2.0, 5.0, 7.0, 1.0, 3.0],
            grid,
        );
        assert_eq!(out, vec![2.0, 7.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn ignores_points_beyond_the_margin() {
        let grid = Grid::new(10.0, 12.0, 3).unwrap();
        let out = run(
            &[1.0, 9.4, 9.6, 12.4, 12.6, 20.0],
            &[100.0, 8.0, 4.0, 6.0, 9.0, 100.0],
            grid,
        );
        // 9.4 and 12.6 round to cells -1 and 3, outside the grid.
        assert_eq!(out, vec![4.0, 0.0, 6.0]);
    }

    #[test]
    fn half_cell_below_start_rounds_up_into_first_cell() {
        let grid = Grid::new(0.0, 2.0, 3).unwrap();
        let out = run(&[-0.5], &[3.0], grid);
        assert_eq!(out, vec![3.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_width_grid_only_takes_exact_hits() {
        let grid = Grid::new(1.0, 1.0, 1).unwrap();
        assert_eq!(run(&[0.5, 1.0, 1.0, 2.0], &[9.0, 2.0, 4.0, 9.0], grid), vec![4.0]);
        assert_eq!(run(&[0.5, 2.0], &[9.0, 9.0], grid), vec![0.0]);
    }

    #[test]
    fn empty_trace_gives_zeros() {
        let grid = Grid::new(0.0, 1.0, 4).unwrap();
        assert_eq!(run(&[], &[], grid), vec![0.0; 4]);
    }
}
