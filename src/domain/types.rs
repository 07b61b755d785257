//! Shared domain types.
//!
//! These are plain values: they are built once (parameters per candidate,
//! samples per load) and never mutated afterwards.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::math::linspace;
use crate::optim::{Bounds, DeOptions};

/// First parameter position assigned to row 0.
pub const T_START: f64 = 6.0;
/// Last parameter position assigned to row N-1.
pub const T_STOP: f64 = 60.0;

/// Number of free curve parameters (θ, M, X).
pub const PARAM_COUNT: usize = 3;

/// Curve parameters: rotation angle (degrees), exponential growth rate, x offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    pub theta_deg: f64,
    pub m: f64,
    pub x_offset: f64,
}

impl CurveParams {
    pub fn new(theta_deg: f64, m: f64, x_offset: f64) -> Self {
        Self {
            theta_deg,
            m,
            x_offset,
        }
    }

    /// Build from an optimizer vector laid out as `[θ, M, X]`.
    pub fn from_slice(values: &[f64]) -> Result<Self, FitError> {
        match values {
            &[theta_deg, m, x_offset] => Ok(Self::new(theta_deg, m, x_offset)),
            _ => Err(FitError::DimensionMismatch {
                expected: PARAM_COUNT,
                found: values.len(),
            }),
        }
    }

    pub fn to_array(self) -> [f64; PARAM_COUNT] {
        [self.theta_deg, self.m, self.x_offset]
    }

    pub fn theta_rad(self) -> f64 {
        self.theta_deg.to_radians()
    }
}

/// Box constraints for the three curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    pub theta_deg: (f64, f64),
    pub m: (f64, f64),
    pub x_offset: (f64, f64),
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            theta_deg: (0.0, 50.0),
            m: (-0.05, 0.05),
            x_offset: (0.0, 100.0),
        }
    }
}

impl ParamBounds {
    /// Convert to the optimizer's generic bounds (validates every pair).
    pub fn to_bounds(&self) -> Result<Bounds, FitError> {
        Bounds::new(&[self.theta_deg, self.m, self.x_offset])
    }

    pub fn contains(&self, p: &CurveParams) -> bool {
        let inside = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        inside(p.theta_deg, self.theta_deg) && inside(p.m, self.m) && inside(p.x_offset, self.x_offset)
    }
}

/// Observed points paired with their parameter positions.
///
/// Invariant: `x`, `y`, `t` are non-empty and share one length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    x: Vec<f64>,
    y: Vec<f64>,
    t: Vec<f64>,
}

impl SampleSet {
    /// Build a sample set from explicit positions.
    pub fn new(x: Vec<f64>, y: Vec<f64>, t: Vec<f64>) -> Result<Self, FitError> {
        if x.len() != y.len() || x.len() != t.len() {
            return Err(FitError::ShapeMismatch {
                x: x.len(),
                y: y.len(),
                t: t.len(),
            });
        }
        if x.is_empty() {
            return Err(FitError::EmptySamples);
        }
        Ok(Self { x, y, t })
    }

    /// Build a sample set whose positions are `linspace(T_START, T_STOP, n)` by row order.
    pub fn from_observations(x: Vec<f64>, y: Vec<f64>) -> Result<Self, FitError> {
        let t = linspace(T_START, T_STOP, x.len());
        Self::new(x, y, t)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    /// First sample as `(x_obs, y_obs, t)`.
    pub fn first(&self) -> (f64, f64, f64) {
        (self.x[0], self.y[0], self.t[0])
    }
}

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Differential evolution mutation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Strategy {
    /// `best + F·(r0 − r1)` with binomial crossover.
    #[serde(rename = "best1bin")]
    #[value(name = "best1bin")]
    Best1Bin,
    /// `r0 + F·(r1 − r2)` with binomial crossover.
    #[serde(rename = "rand1bin")]
    #[value(name = "rand1bin")]
    Rand1Bin,
}

impl Strategy {
    /// Number of distinct random members (besides the target) a trial draws from.
    pub fn donors(self) -> usize {
        match self {
            Strategy::Best1Bin => 2,
            Strategy::Rand1Bin => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Strategy::Best1Bin => "best1bin",
            Strategy::Rand1Bin => "rand1bin",
        }
    }
}

/// How the initial population is laid out in the unit hypercube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InitMethod {
    /// One member per stratum along every dimension.
    LatinHypercube,
    /// Independent uniform draws.
    Random,
}

/// A full fit run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub bounds: ParamBounds,
    pub optimizer: DeOptions,
    pub output: OutputFormat,
}

/// Best-fit parameters plus run diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: CurveParams,
    /// Total L1 loss over all samples.
    pub loss: f64,
    pub n_samples: usize,
    pub generations: usize,
    pub evaluations: usize,
    pub converged: bool,
    pub polished: bool,
    pub message: String,
}

impl FitResult {
    /// Mean L1 distance per sample.
    pub fn average_loss(&self) -> f64 {
        self.loss / self.n_samples as f64
    }
}
