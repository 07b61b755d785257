//! Local refinement of the global-search winner.
//!
//! The L1 objective has kinks wherever a residual crosses zero, so we polish
//! with Nelder–Mead (derivative-free) rather than a gradient method. The
//! solver itself is unbounded; the bounds are enforced by evaluating the
//! objective at the projection of each simplex vertex onto the box and by
//! projecting the final answer.

use std::cell::Cell;

use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::neldermead::NelderMead;

use crate::error::FitError;
use crate::optim::{Bounds, rank_energy};

/// Relative edge length of the initial simplex (fraction of each bound width).
const SIMPLEX_STEP: f64 = 0.05;

/// Options for [`polish`].
#[derive(Debug, Clone, Copy)]
pub struct PolishOptions {
    pub max_iters: u64,
    /// Stop when the standard deviation of simplex costs falls below this.
    pub sd_tolerance: f64,
}

impl Default for PolishOptions {
    fn default() -> Self {
        Self {
            max_iters: 2_000,
            sd_tolerance: 1e-12,
        }
    }
}

/// Result of a polish run.
#[derive(Debug, Clone, PartialEq)]
pub struct Polished {
    /// Refined point, inside the bounds.
    pub x: Vec<f64>,
    pub fun: f64,
    pub evaluations: usize,
}

struct BoxedObjective<'a, F> {
    objective: &'a F,
    bounds: &'a Bounds,
    evaluations: &'a Cell<usize>,
}

impl<F> CostFunction for BoxedObjective<'_, F>
where
    F: Fn(&[f64]) -> f64,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        self.evaluations.set(self.evaluations.get() + 1);
        let inside = self.bounds.clip(param);
        let value = rank_energy((self.objective)(&inside));
        // Keep the simplex arithmetic finite.
        Ok(if value.is_finite() { value } else { f64::MAX })
    }
}

/// Refine `start` with bounded Nelder–Mead.
pub fn polish<F>(objective: &F, bounds: &Bounds, start: &[f64], opts: &PolishOptions) -> Result<Polished, FitError>
where
    F: Fn(&[f64]) -> f64,
{
    if start.len() != bounds.dim() {
        return Err(FitError::DimensionMismatch {
            expected: bounds.dim(),
            found: start.len(),
        });
    }

    let simplex = initial_simplex(bounds, &bounds.clip(start));
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(opts.sd_tolerance)
        .map_err(|e| FitError::Polish(e.to_string()))?;

    let evaluations = Cell::new(0);
    let problem = BoxedObjective {
        objective,
        bounds,
        evaluations: &evaluations,
    };

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(opts.max_iters))
        .run()
        .map_err(|e| FitError::Polish(e.to_string()))?;

    let state = result.state();
    let best = state
        .get_best_param()
        .ok_or_else(|| FitError::Polish("solver returned no parameters".to_string()))?;
    let x = bounds.clip(best);
    let fun = rank_energy(objective(&x));

    Ok(Polished {
        x,
        fun,
        evaluations: evaluations.get() + 1,
    })
}

/// `dim + 1` vertices: the start point plus one step along each axis, stepping
/// inward when the start sits on the upper bound.
fn initial_simplex(bounds: &Bounds, start: &[f64]) -> Vec<Vec<f64>> {
    let width = bounds.width();
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let step = SIMPLEX_STEP * width[i];
        let mut vertex = start.to_vec();
        vertex[i] = if start[i] + step <= bounds.upper()[i] {
            start[i] + step
        } else {
            start[i] - step
        };
        simplex.push(vertex);
    }
    simplex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polish_reaches_interior_minimum() {
        let bounds = Bounds::new(&[(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
        let f = |v: &[f64]| (v[0] - 1.0).powi(2) + 10.0 * (v[1] + 2.0).powi(2);
        let out = polish(&f, &bounds, &[0.5, -1.0], &PolishOptions::default()).unwrap();
        assert!((out.x[0] - 1.0).abs() < 1e-4, "{:?}", out.x);
        assert!((out.x[1] + 2.0).abs() < 1e-4, "{:?}", out.x);
        assert!(out.fun < 1e-8);
        assert!(out.evaluations > 0);
    }

    #[test]
    fn polish_respects_bounds() {
        let bounds = Bounds::new(&[(0.0, 1.0), (0.0, 1.0)]).unwrap();
        // Unconstrained minimum at (3, -3); the constrained one is the corner (1, 0).
        let f = |v: &[f64]| (v[0] - 3.0).powi(2) + (v[1] + 3.0).powi(2);
        let out = polish(&f, &bounds, &[0.9, 0.1], &PolishOptions::default()).unwrap();
        assert!(bounds.contains(&out.x));
        assert!((out.x[0] - 1.0).abs() < 1e-6);
        assert!(out.x[1].abs() < 1e-6);
    }

    #[test]
    fn polish_checks_dimension() {
        let bounds = Bounds::new(&[(0.0, 1.0)]).unwrap();
        let f = |v: &[f64]| v[0];
        assert!(matches!(
            polish(&f, &bounds, &[0.1, 0.2], &PolishOptions::default()),
            Err(FitError::DimensionMismatch { expected: 1, found: 2 })
        ));
    }
}
