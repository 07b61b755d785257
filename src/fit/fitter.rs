//! Fit the curve to a sample set with any [`GlobalMinimizer`].
//!
//! This is the only place where the typed curve parameters meet the
//! optimizer's plain vectors.

use tracing::info;

use crate::domain::{CurveParams, FitResult, ParamBounds, SampleSet};
use crate::error::FitError;
use crate::fit::loss::objective;
use crate::optim::GlobalMinimizer;

/// Find the parameters inside `bounds` that minimize the L1 loss over `samples`.
pub fn find_optimal_parameters<M: GlobalMinimizer>(
    samples: &SampleSet,
    bounds: &ParamBounds,
    minimizer: &M,
) -> Result<FitResult, FitError> {
    let bounds = bounds.to_bounds()?;
    info!(n_samples = samples.len(), "fitting curve parameters");

    let outcome = minimizer.minimize(objective(samples), &bounds)?;
    let params = CurveParams::from_slice(&outcome.x)?;

    info!(
        theta_deg = params.theta_deg,
        m = params.m,
        x_offset = params.x_offset,
        loss = outcome.fun,
        "fit complete"
    );

    Ok(FitResult {
        params,
        loss: outcome.fun,
        n_samples: samples.len(),
        generations: outcome.generations,
        evaluations: outcome.evaluations,
        converged: outcome.converged,
        polished: outcome.polished,
        message: outcome.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::loss::l1_loss_samples;
    use crate::math::linspace;
    use crate::models::predict_curve_points;
    use crate::optim::{Bounds, DeOptions, DifferentialEvolution, OptimizeResult};

    /// Exhaustive grid over the box; stands in for a different search strategy.
    struct GridSearch {
        steps: usize,
    }

    impl GlobalMinimizer for GridSearch {
        fn minimize<F>(&self, objective: F, bounds: &Bounds) -> Result<OptimizeResult, FitError>
        where
            F: Fn(&[f64]) -> f64,
        {
            let axes: Vec<Vec<f64>> = (0..bounds.dim())
                .map(|i| linspace(bounds.lower()[i], bounds.upper()[i], self.steps))
                .collect();
            let mut best = (Vec::new(), f64::INFINITY);
            let mut evaluations = 0;
            for &a in &axes[0] {
                for &b in &axes[1] {
                    for &c in &axes[2] {
                        let v = vec![a, b, c];
                        let f = objective(&v);
                        evaluations += 1;
                        if f < best.1 {
                            best = (v, f);
                        }
                    }
                }
            }
            Ok(OptimizeResult {
                x: best.0,
                fun: best.1,
                generations: 1,
                evaluations,
                converged: true,
                polished: false,
                message: "grid exhausted".to_string(),
            })
        }
    }

    fn synthetic(params: &CurveParams, n: usize) -> SampleSet {
        let t = linspace(6.0, 60.0, n);
        let (x, y) = predict_curve_points(params, &t);
        SampleSet::from_observations(x, y).unwrap()
    }

    #[test]
    fn alternative_minimizer_plugs_in() {
        // Truth lies on the 11-step grid: θ ∈ {0, 5, ...}, M ∈ {-0.05, -0.04, ...}, X ∈ {0, 10, ...}.
        let truth = CurveParams::new(20.0, 0.01, 30.0);
        let samples = synthetic(&truth, 40);
        let fit = find_optimal_parameters(&samples, &ParamBounds::default(), &GridSearch { steps: 11 }).unwrap();
        assert!((fit.params.theta_deg - 20.0).abs() < 1e-9);
        assert!((fit.params.m - 0.01).abs() < 1e-9);
        assert!((fit.params.x_offset - 30.0).abs() < 1e-9);
        assert!(fit.loss < 1e-6);
        assert_eq!(fit.evaluations, 11 * 11 * 11);
    }

    #[test]
    fn result_loss_matches_reported_params() {
        let truth = CurveParams::new(35.0, -0.01, 70.0);
        let samples = synthetic(&truth, 60);
        let de = DifferentialEvolution::new(DeOptions {
            max_generations: 200,
            popsize: 10,
            seed: Some(21),
            ..DeOptions::default()
        });
        let fit = find_optimal_parameters(&samples, &ParamBounds::default(), &de).unwrap();
        assert!(ParamBounds::default().contains(&fit.params));
        assert!((l1_loss_samples(&fit.params, &samples) - fit.loss).abs() < 1e-9);
        assert!((fit.average_loss() * 60.0 - fit.loss).abs() < 1e-9);
    }

    #[test]
    fn invalid_bounds_fail_before_search() {
        let samples = synthetic(&CurveParams::new(10.0, 0.0, 10.0), 10);
        let bounds = ParamBounds {
            m: (0.05, -0.05),
            ..ParamBounds::default()
        };
        let err = find_optimal_parameters(&samples, &bounds, &DifferentialEvolution::default()).unwrap_err();
        assert!(matches!(err, FitError::InvalidBounds { index: 1, .. }));
    }
}
