//! Differential evolution over a box.
//!
//! The population lives in the unit hypercube and is mapped into the bounds
//! only for evaluation, so mutation and crossover never see parameter units.
//!
//! Per generation:
//! - draw a mutation scale `F ~ U(mutation.0, mutation.1)` (dithering)
//! - for every member, build a mutant from the strategy's donors, cross it
//!   with the member (binomial, one coordinate always taken from the mutant),
//!   resample coordinates that left `[0, 1]`, and keep the trial if its
//!   energy is `<=` the member's
//! - the best member is kept at index 0 and updated immediately, so later
//!   trials in the same generation already use it
//!
//! The run stops at `max_generations` or once
//! `std(energies) <= atol + tol * |mean(energies)|`.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::domain::{InitMethod, Strategy};
use crate::error::FitError;
use crate::math::mean_std;
use crate::optim::init::init_population;
use crate::optim::polish::{PolishOptions, polish};
use crate::optim::{Bounds, GlobalMinimizer, OptimizeResult, rank_energy};

/// Smallest population regardless of `popsize`.
const MIN_MEMBERS: usize = 5;

/// Differential evolution settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DeOptions {
    pub strategy: Strategy,
    /// Hard cap on generations.
    pub max_generations: usize,
    /// Population size as a multiple of the problem dimension.
    pub popsize: usize,
    /// Relative convergence tolerance on the spread of energies.
    pub tol: f64,
    /// Absolute convergence tolerance on the spread of energies.
    pub atol: f64,
    /// Crossover probability per coordinate.
    pub recombination: f64,
    /// Range of the per-generation mutation scale.
    pub mutation: (f64, f64),
    pub init: InitMethod,
    /// Refine the winner with Nelder–Mead before returning.
    pub polish: bool,
    /// `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    /// Emit a progress line every this many generations (0 = never).
    pub log_every: usize,
}

impl Default for DeOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Best1Bin,
            max_generations: 3000,
            popsize: 50,
            tol: 1e-9,
            atol: 0.0,
            recombination: 0.8,
            mutation: (0.5, 1.0),
            init: InitMethod::LatinHypercube,
            polish: true,
            seed: None,
            log_every: 100,
        }
    }
}

impl DeOptions {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.popsize == 0 {
            return Err(FitError::InvalidOption {
                name: "popsize",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.max_generations == 0 {
            return Err(FitError::InvalidOption {
                name: "max_generations",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(FitError::InvalidOption {
                name: "tol",
                value: self.tol,
                reason: "must be finite and non-negative",
            });
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(FitError::InvalidOption {
                name: "atol",
                value: self.atol,
                reason: "must be finite and non-negative",
            });
        }
        if !(0.0..=1.0).contains(&self.recombination) {
            return Err(FitError::InvalidOption {
                name: "recombination",
                value: self.recombination,
                reason: "must lie in [0, 1]",
            });
        }
        let (lo, hi) = self.mutation;
        if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo <= hi && hi <= 2.0) {
            return Err(FitError::InvalidOption {
                name: "mutation",
                value: if lo.is_finite() && lo >= 0.0 { hi } else { lo },
                reason: "must satisfy 0 <= min <= max <= 2",
            });
        }
        Ok(())
    }

    /// Number of population members for a problem of dimension `dim`.
    pub fn members(&self, dim: usize) -> usize {
        (self.popsize * dim).max(MIN_MEMBERS)
    }
}

/// Differential evolution minimizer.
#[derive(Debug, Clone, Default)]
pub struct DifferentialEvolution {
    opts: DeOptions,
}

impl DifferentialEvolution {
    pub fn new(opts: DeOptions) -> Self {
        Self { opts }
    }

    fn rng(&self) -> StdRng {
        match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn mutation_scale<R: Rng>(&self, rng: &mut R) -> f64 {
        let (lo, hi) = self.opts.mutation;
        if hi > lo { rng.gen_range(lo..hi) } else { lo }
    }

    fn trial<R: Rng>(&self, population: &[DVector<f64>], candidate: usize, scale: f64, rng: &mut R) -> DVector<f64> {
        let donors = pick_donors(rng, population.len(), candidate, self.opts.strategy.donors());
        let mutant = match self.opts.strategy {
            Strategy::Best1Bin => &population[0] + (&population[donors[0]] - &population[donors[1]]) * scale,
            Strategy::Rand1Bin => {
                &population[donors[0]] + (&population[donors[1]] - &population[donors[2]]) * scale
            }
        };

        let mut trial = population[candidate].clone();
        let fill = rng.gen_range(0..trial.len());
        for j in 0..trial.len() {
            if j == fill || rng.r#gen::<f64>() < self.opts.recombination {
                trial[j] = mutant[j];
            }
        }
        for v in trial.iter_mut() {
            if !(0.0..=1.0).contains(v) {
                *v = rng.r#gen::<f64>();
            }
        }
        trial
    }
}

/// Tracks objective evaluations and keeps every evaluated point inside the box.
struct Evaluator<'a, F> {
    objective: &'a F,
    bounds: &'a Bounds,
    evaluations: usize,
}

impl<F> Evaluator<'_, F>
where
    F: Fn(&[f64]) -> f64,
{
    fn point(&self, unit: &DVector<f64>) -> Vec<f64> {
        // Scaling can overshoot an endpoint by an ulp.
        self.bounds.clip(self.bounds.scale(unit).as_slice())
    }

    fn energy(&mut self, unit: &DVector<f64>) -> f64 {
        self.evaluations += 1;
        rank_energy((self.objective)(&self.point(unit)))
    }
}

impl GlobalMinimizer for DifferentialEvolution {
    fn minimize<F>(&self, objective: F, bounds: &Bounds) -> Result<OptimizeResult, FitError>
    where
        F: Fn(&[f64]) -> f64,
    {
        self.opts.validate()?;

        let dim = bounds.dim();
        let members = self.opts.members(dim);
        let mut rng = self.rng();
        let mut eval = Evaluator {
            objective: &objective,
            bounds,
            evaluations: 0,
        };

        info!(
            strategy = self.opts.strategy.display_name(),
            members,
            max_generations = self.opts.max_generations,
            seed = ?self.opts.seed,
            "starting differential evolution"
        );

        let mut population = init_population(self.opts.init, &mut rng, members, dim);
        let mut energies: Vec<f64> = population.iter().map(|m| eval.energy(m)).collect();
        promote_lowest(&mut population, &mut energies);

        let mut generations = 0;
        let mut converged = false;
        for generation in 1..=self.opts.max_generations {
            let scale = self.mutation_scale(&mut rng);
            for candidate in 0..members {
                let trial = self.trial(&population, candidate, scale, &mut rng);
                let energy = eval.energy(&trial);
                if energy <= energies[candidate] {
                    population[candidate] = trial;
                    energies[candidate] = energy;
                    if energy <= energies[0] {
                        population.swap(0, candidate);
                        energies.swap(0, candidate);
                    }
                }
            }
            generations = generation;

            if self.opts.log_every > 0 && generation % self.opts.log_every == 0 {
                debug!(generation, best = energies[0], evaluations = eval.evaluations, "generation complete");
            }
            if has_converged(&energies, self.opts.tol, self.opts.atol) {
                converged = true;
                break;
            }
        }

        let mut x = eval.point(&population[0]);
        let mut fun = energies[0];
        let mut evaluations = eval.evaluations;
        let mut polished = false;

        if self.opts.polish {
            match polish(&objective, bounds, &x, &PolishOptions::default()) {
                Ok(refined) => {
                    evaluations += refined.evaluations;
                    if refined.fun < fun {
                        debug!(before = fun, after = refined.fun, "polish improved the best member");
                        x = refined.x;
                        fun = refined.fun;
                        polished = true;
                    }
                }
                Err(err) => warn!(%err, "polish failed; keeping the global-search result"),
            }
        }

        let message = if converged {
            "Optimization terminated successfully.".to_string()
        } else {
            "Maximum number of generations reached.".to_string()
        };
        info!(generations, evaluations, fun, converged, polished, "differential evolution finished");

        Ok(OptimizeResult {
            x,
            fun,
            generations,
            evaluations,
            converged,
            polished,
            message,
        })
    }
}

/// Choose `count` distinct member indices, none equal to `candidate`.
fn pick_donors<R: Rng>(rng: &mut R, members: usize, candidate: usize, count: usize) -> Vec<usize> {
    index::sample(rng, members, count + 1)
        .into_iter()
        .filter(|&i| i != candidate)
        .take(count)
        .collect()
}

/// Move the lowest-energy member to index 0.
fn promote_lowest(population: &mut [DVector<f64>], energies: &mut [f64]) {
    let best = energies
        .iter()
        .enumerate()
        .fold(0, |best, (i, &e)| if e < energies[best] { i } else { best });
    population.swap(0, best);
    energies.swap(0, best);
}

fn has_converged(energies: &[f64], tol: f64, atol: f64) -> bool {
    if energies.iter().any(|e| e.is_infinite()) {
        return false;
    }
    match mean_std(energies) {
        Some((mean, std)) => std <= atol + tol * mean.abs(),
        None => false,
    }
}
