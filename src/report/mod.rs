//! What a finished fit reports.
//!
//! [`FitReport`] gathers the first-sample check, the per-point average loss
//! and the LaTeX form of the curve; [`format`] renders it as text or JSON.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::{CurveParams, FitResult, SampleSet};
use crate::fit::point_l1;
use crate::models::predict_point;

/// Observed vs. predicted at one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointCheck {
    pub t: f64,
    pub observed: (f64, f64),
    pub predicted: (f64, f64),
    pub l1: f64,
}

/// Compare the first sample against the curve.
pub fn check_first_point(samples: &SampleSet, params: &CurveParams) -> PointCheck {
    let (x_obs, y_obs, t) = samples.first();
    PointCheck {
        t,
        observed: (x_obs, y_obs),
        predicted: predict_point(params, t),
        l1: point_l1(params, t, x_obs, y_obs),
    }
}

/// Everything the report prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    pub first_point: PointCheck,
    pub average_l1: f64,
    pub fit: FitResult,
    pub expression: String,
}

impl FitReport {
    pub fn new(samples: &SampleSet, fit: &FitResult) -> Self {
        Self {
            first_point: check_first_point(samples, &fit.params),
            average_l1: fit.average_loss(),
            fit: fit.clone(),
            expression: latex_expression(&fit.params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit_for(params: CurveParams, loss: f64, n: usize) -> FitResult {
        FitResult {
            params,
            loss,
            n_samples: n,
            generations: 10,
            evaluations: 100,
            converged: true,
            polished: false,
            message: "ok".to_string(),
        }
    }

    #[test]
    fn first_point_uses_first_position() {
        let samples = SampleSet::from_observations(vec![7.0, 9.0], vec![40.0, 41.0]).unwrap();
        let params = CurveParams::new(0.0, 0.0, 0.0);
        let check = check_first_point(&samples, &params);
        assert_eq!(check.t, 6.0);
        assert_eq!(check.observed, (7.0, 40.0));
        assert!((check.predicted.0 - 6.0).abs() < 1e-12);
        let expected_y = 42.0 + (0.3_f64 * 6.0).sin();
        assert!((check.predicted.1 - expected_y).abs() < 1e-12);
        assert!((check.l1 - (1.0 + (40.0 - expected_y).abs())).abs() < 1e-12);
    }

    #[test]
    fn average_times_count_restores_total() {
        let samples = SampleSet::from_observations(vec![1.0; 7], vec![2.0; 7]).unwrap();
        let report = FitReport::new(&samples, &fit_for(CurveParams::new(1.0, 0.0, 1.0), 12.25, 7));
        assert!((report.average_l1 * 7.0 - 12.25).abs() < 1e-12);
    }
}
