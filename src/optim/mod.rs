//! Bounded global minimization.
//!
//! - [`GlobalMinimizer`]: the capability the fitter depends on
//!   (objective + bounds in, best vector + loss out).
//! - [`DifferentialEvolution`]: the default implementation.
//! - [`polish`]: local Nelder–Mead refinement used after the global search.
//!
//! Search vectors are plain `&[f64]` so the optimizer knows nothing about the
//! curve model.

pub mod differential_evolution;
pub mod init;
pub mod polish;

pub use differential_evolution::*;

use nalgebra::DVector;

use crate::error::FitError;

/// Closed box constraints, one `[lower, upper]` interval per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: DVector<f64>,
    upper: DVector<f64>,
}

impl Bounds {
    /// Build bounds from `(lower, upper)` pairs.
    ///
    /// Every pair must be finite with `lower < upper`.
    pub fn new(pairs: &[(f64, f64)]) -> Result<Self, FitError> {
        if pairs.is_empty() {
            return Err(FitError::DimensionMismatch {
                expected: 1,
                found: 0,
            });
        }
        for (index, &(lower, upper)) in pairs.iter().enumerate() {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(FitError::InvalidBounds { index, lower, upper });
            }
        }
        Ok(Self {
            lower: DVector::from_iterator(pairs.len(), pairs.iter().map(|p| p.0)),
            upper: DVector::from_iterator(pairs.len(), pairs.iter().map(|p| p.1)),
        })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &DVector<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &DVector<f64> {
        &self.upper
    }

    pub fn width(&self) -> DVector<f64> {
        &self.upper - &self.lower
    }

    pub fn contains(&self, v: &[f64]) -> bool {
        v.len() == self.dim()
            && v
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&x, (&lo, &hi))| x >= lo && x <= hi)
    }

    /// Project `v` onto the box.
    pub fn clip(&self, v: &[f64]) -> Vec<f64> {
        v.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|(&x, (&lo, &hi))| x.clamp(lo, hi))
            .collect()
    }

    /// Map a point of the unit hypercube into the box.
    pub fn scale(&self, unit: &DVector<f64>) -> DVector<f64> {
        &self.lower + unit.component_mul(&self.width())
    }
}

/// Outcome of a global minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeResult {
    /// Best vector found (inside the bounds).
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Completed generations.
    pub generations: usize,
    /// Objective evaluations, polish included.
    pub evaluations: usize,
    /// Whether the population met the convergence tolerance.
    pub converged: bool,
    /// Whether the local polish improved the result.
    pub polished: bool,
    pub message: String,
}

/// A bounded, derivative-free global search.
///
/// Implementations must only evaluate `objective` at points inside `bounds`
/// and must return a point inside `bounds`.
pub trait GlobalMinimizer {
    fn minimize<F>(&self, objective: F, bounds: &Bounds) -> Result<OptimizeResult, FitError>
    where
        F: Fn(&[f64]) -> f64;
}

/// Objective values used for ranking: NaN sorts after every finite value.
#[inline]
pub(crate) fn rank_energy(value: f64) -> f64 {
    if value.is_nan() { f64::INFINITY } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_reject_inverted_or_non_finite_pairs() {
        assert!(matches!(
            Bounds::new(&[(0.0, 1.0), (2.0, 1.0)]),
            Err(FitError::InvalidBounds { index: 1, .. })
        ));
        assert!(Bounds::new(&[(0.0, f64::INFINITY)]).is_err());
        assert!(Bounds::new(&[]).is_err());
    }

    #[test]
    fn scale_maps_unit_cube_onto_box() {
        let b = Bounds::new(&[(0.0, 50.0), (-0.05, 0.05), (0.0, 100.0)]).unwrap();
        let unit = DVector::from_column_slice(&[0.5, 0.25, 1.0]);
        let real = b.scale(&unit);
        assert!((real[0] - 25.0).abs() < 1e-12);
        assert!((real[1] + 0.025).abs() < 1e-12);
        assert!((real[2] - 100.0).abs() < 1e-12);
        assert!(b.contains(b.scale(&DVector::zeros(3)).as_slice()));
    }

    #[test]
    fn clip_projects_onto_box() {
        let b = Bounds::new(&[(0.0, 1.0), (-1.0, 1.0)]).unwrap();
        assert_eq!(b.clip(&[1.5, -3.0]), vec![1.0, -1.0]);
        assert!(b.contains(&b.clip(&[f64::MAX, f64::MIN])));
        assert!(!b.contains(&[0.5]));
    }

    #[test]
    fn nan_ranks_worst() {
        assert_eq!(rank_energy(f64::NAN), f64::INFINITY);
        assert_eq!(rank_energy(1.5), 1.5);
    }
}
