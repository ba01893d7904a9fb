#![allow(dead_code)]

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An irregular, strictly ascending trace spanning `[0, 10]`.
pub fn irregular_trace() -> (Vec<f64>, Vec<f64>) {
    let x = vec![0.0, 0.7, 1.1, 2.5, 3.0, 4.2, 5.5, 6.1, 7.9, 8.4, 10.0];
    let y = vec![1.0, 3.0, 8.0, 2.0, 0.5, 6.0, 9.0, 4.0, 1.5, 7.0, 2.0];
    (x, y)
}

/// Exact area under the piecewise-linear curve through `(x, y)`.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (yw[0] + yw[1]) * (xw[1] - xw[0]) / 2.0)
        .sum()
}
