//! Evaluation of the rotated exponential-sine curve.
//!
//! For parameters `(θ, M, X)` and position `t`:
//!
//! ```text
//! E(t) = exp(M·|t|) · sin(0.3·t)
//! x(t) = t·cos θ − E(t)·sin θ + X
//! y(t) = 42 + t·sin θ + E(t)·cos θ
//! ```
//!
//! i.e. the planar curve `(t, E(t))` rotated by `θ` and shifted by `(X, 42)`.
//! The exponential term is not guarded against overflow; the parameter bounds
//! keep `|M·t|` small.

use crate::domain::CurveParams;

/// Vertical offset of the curve.
pub const Y_OFFSET: f64 = 42.0;

/// Angular frequency of the oscillating term.
pub const OSCILLATION_FREQ: f64 = 0.3;

/// A curve with its rotation precomputed.
///
/// Building this once per candidate avoids recomputing `sin θ`/`cos θ` for
/// every sample.
#[derive(Debug, Clone, Copy)]
pub struct Curve {
    m: f64,
    x_offset: f64,
    sin_theta: f64,
    cos_theta: f64,
}

impl Curve {
    pub fn new(params: &CurveParams) -> Self {
        let (sin_theta, cos_theta) = params.theta_rad().sin_cos();
        Self {
            m: params.m,
            x_offset: params.x_offset,
            sin_theta,
            cos_theta,
        }
    }

    /// Point on the curve at position `t`.
    #[inline]
    pub fn point(&self, t: f64) -> (f64, f64) {
        let e = (self.m * t.abs()).exp() * (OSCILLATION_FREQ * t).sin();
        let x = t * self.cos_theta - e * self.sin_theta + self.x_offset;
        let y = Y_OFFSET + t * self.sin_theta + e * self.cos_theta;
        (x, y)
    }

    /// Points at every position in `t`, returned as separate x and y columns.
    pub fn points(&self, t: &[f64]) -> (Vec<f64>, Vec<f64>) {
        t.iter().map(|&ti| self.point(ti)).unzip()
    }
}

/// Predict a single `(x, y)` point.
pub fn predict_point(params: &CurveParams, t: f64) -> (f64, f64) {
    Curve::new(params).point(t)
}

/// Predict `(x, y)` for every position in `t`.
pub fn predict_curve_points(params: &CurveParams, t: &[f64]) -> (Vec<f64>, Vec<f64>) {
    Curve::new(params).points(t)
}
