//! Evenly spaced grids.
//!
//! Samples carry no explicit parameter value; the i-th row is pinned to the i-th
//! point of a fixed linear grid. This module builds that grid.

/// Generate `steps` evenly spaced points between `start` and `stop` (inclusive).
///
/// - `steps == 0` yields an empty grid.
/// - `steps == 1` yields `[start]`.
/// - the last point is exactly `stop` (no accumulated rounding).
pub fn linspace(start: f64, stop: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (steps as f64 - 1.0);
            let mut out: Vec<f64> = (0..steps).map(|i| start + step * i as f64).collect();
            out[steps - 1] = stop;
            out
        }
    }
}
