//! L1 (Manhattan) loss between observed points and the curve.
//!
//! ```text
//! loss(p) = Σ_i |x_i − x̂_i(p)| + |y_i − ŷ_i(p)|
//! ```
//!
//! L1 keeps a handful of stray samples from dominating the fit.

use crate::domain::{CurveParams, SampleSet};
use crate::error::FitError;
use crate::models::Curve;

/// L1 distance between one observed point and the curve at `t`.
pub fn point_l1(params: &CurveParams, t: f64, x_obs: f64, y_obs: f64) -> f64 {
    let (x, y) = Curve::new(params).point(t);
    (x_obs - x).abs() + (y_obs - y).abs()
}

/// Total L1 loss over parallel slices.
///
/// Fails with [`FitError::ShapeMismatch`] unless all three slices have the
/// same length.
pub fn l1_loss(params: &CurveParams, t: &[f64], x_obs: &[f64], y_obs: &[f64]) -> Result<f64, FitError> {
    if x_obs.len() != y_obs.len() || x_obs.len() != t.len() {
        return Err(FitError::ShapeMismatch {
            x: x_obs.len(),
            y: y_obs.len(),
            t: t.len(),
        });
    }
    Ok(sum_l1(params, t, x_obs, y_obs))
}

/// Total L1 loss over a validated sample set.
pub fn l1_loss_samples(params: &CurveParams, samples: &SampleSet) -> f64 {
    sum_l1(params, samples.t(), samples.x(), samples.y())
}

/// Callers guarantee equal lengths.
fn sum_l1(params: &CurveParams, t: &[f64], x_obs: &[f64], y_obs: &[f64]) -> f64 {
    let curve = Curve::new(params);
    t.iter()
        .zip(x_obs.iter().zip(y_obs.iter()))
        .map(|(&ti, (&xo, &yo))| {
            let (x, y) = curve.point(ti);
            (xo - x).abs() + (yo - y).abs()
        })
        .sum()
}

/// Objective in the optimizer's shape: candidate `[θ, M, X]` first, data captured.
///
/// A vector of the wrong length scores `NaN`, which the optimizer ranks last.
pub fn objective(samples: &SampleSet) -> impl Fn(&[f64]) -> f64 + '_ {
    move |candidate: &[f64]| match CurveParams::from_slice(candidate) {
        Ok(params) => l1_loss_samples(&params, samples),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict_curve_points;

    fn samples_from(params: &CurveParams, n: usize) -> SampleSet {
        let t = crate::math::linspace(6.0, 60.0, n);
        let (x, y) = predict_curve_points(params, &t);
        SampleSet::new(x, y, t).unwrap()
    }

    #[test]
    fn loss_is_zero_on_exact_data() {
        let truth = CurveParams::new(15.0, 0.01, 10.0);
        let samples = samples_from(&truth, 200);
        assert_eq!(l1_loss_samples(&truth, &samples), 0.0);
    }

    #[test]
    fn loss_is_positive_off_the_curve() {
        let truth = CurveParams::new(15.0, 0.01, 10.0);
        let samples = samples_from(&truth, 200);
        for other in [
            CurveParams::new(15.1, 0.01, 10.0),
            CurveParams::new(15.0, 0.0, 10.0),
            CurveParams::new(0.0, -0.05, 100.0),
        ] {
            assert!(l1_loss_samples(&other, &samples) > 0.0);
        }
    }

    #[test]
    fn shifting_x_offset_costs_shift_per_point() {
        let truth = CurveParams::new(30.0, -0.02, 40.0);
        let samples = samples_from(&truth, 50);
        let shifted = CurveParams { x_offset: 41.5, ..truth };
        let loss = l1_loss_samples(&shifted, &samples);
        assert!((loss - 1.5 * 50.0).abs() < 1e-9, "loss = {loss}");
    }

    #[test]
    fn total_is_sum_of_point_terms() {
        let truth = CurveParams::new(22.0, 0.02, 55.0);
        let samples = samples_from(&truth, 80);
        let guess = CurveParams::new(25.0, 0.015, 50.0);

        let total = l1_loss_samples(&guess, &samples);
        let by_point: f64 = (0..samples.len())
            .map(|i| point_l1(&guess, samples.t()[i], samples.x()[i], samples.y()[i]))
            .sum();
        assert!((total - by_point).abs() < 1e-9 * total.max(1.0));

        let average = total / samples.len() as f64;
        assert!((average * samples.len() as f64 - total).abs() < 1e-9 * total);
    }

    #[test]
    fn slice_loss_matches_sample_loss() {
        let truth = CurveParams::new(15.0, 0.01, 10.0);
        let samples = samples_from(&truth, 30);
        let guess = CurveParams::new(12.0, 0.0, 8.0);
        let raw = l1_loss(&guess, samples.t(), samples.x(), samples.y()).unwrap();
        assert_eq!(raw, l1_loss_samples(&guess, &samples));
    }

    #[test]
    fn slice_loss_rejects_mismatched_lengths() {
        let params = CurveParams::new(0.0, 0.0, 0.0);
        let y0 = 42.0 + (1.8_f64).sin();
        let err = l1_loss(&params, &[6.0, 33.0, 60.0], &[6.0], &[y0]).unwrap_err();
        assert_eq!(err, FitError::ShapeMismatch { x: 1, y: 1, t: 3 });
        assert!(l1_loss(&params, &[6.0], &[6.0], &[]).is_err());
    }

    #[test]
    fn hand_computed_single_point() {
        // θ = 0, M = 0, X = 0: curve point is (t, 42 + sin(0.3 t)).
        let params = CurveParams::new(0.0, 0.0, 0.0);
        let t = 10.0;
        let expected = (1.0_f64 - t).abs() + (40.0 - (42.0 + (0.3 * t).sin())).abs();
        assert!((point_l1(&params, t, 1.0, 40.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn objective_matches_loss_and_flags_bad_shape() {
        let truth = CurveParams::new(15.0, 0.01, 10.0);
        let samples = samples_from(&truth, 20);
        let f = objective(&samples);
        let guess = CurveParams::new(10.0, 0.0, 5.0);
        assert_eq!(f(&guess.to_array()), l1_loss_samples(&guess, &samples));
        assert!(f(&[1.0, 2.0]).is_nan());
    }
}
