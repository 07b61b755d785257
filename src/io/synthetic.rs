//! Synthetic sample generation.
//!
//! Evaluates the curve at known parameters over the standard position grid,
//! optionally adds Gaussian noise to both coordinates, and writes an `x,y` CSV
//! that [`crate::io::load_samples`] reads back.

use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CurveParams, SampleSet};
use crate::error::FitError;
use crate::models::predict_curve_points;

/// What to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpec {
    pub params: CurveParams,
    pub n_samples: usize,
    /// Standard deviation of the additive noise (0 = exact curve points).
    pub noise_sd: f64,
    pub seed: u64,
}

/// Build the sample set described by `spec`.
pub fn generate_samples(spec: &SyntheticSpec) -> Result<SampleSet, FitError> {
    if spec.n_samples == 0 {
        return Err(FitError::EmptySamples);
    }
    if !(spec.noise_sd.is_finite() && spec.noise_sd >= 0.0) {
        return Err(FitError::InvalidOption {
            name: "noise_sd",
            value: spec.noise_sd,
            reason: "must be finite and non-negative",
        });
    }

    let t = crate::math::linspace(crate::domain::T_START, crate::domain::T_STOP, spec.n_samples);
    let (mut x, mut y) = predict_curve_points(&spec.params, &t);

    if spec.noise_sd > 0.0 {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let normal = Normal::new(0.0, spec.noise_sd).map_err(|_| FitError::InvalidOption {
            name: "noise_sd",
            value: spec.noise_sd,
            reason: "rejected by the normal distribution",
        })?;
        for (xi, yi) in x.iter_mut().zip(y.iter_mut()) {
            *xi += normal.sample(&mut rng);
            *yi += normal.sample(&mut rng);
        }
    }

    SampleSet::new(x, y, t)
}

/// Write `samples` as an `x,y` CSV.
pub fn write_samples_csv(path: &Path, samples: &SampleSet) -> Result<(), FitError> {
    let unavailable = |reason: String| FitError::InputUnavailable {
        path: path.to_path_buf(),
        reason,
    };
    let mut writer = csv::Writer::from_path(path).map_err(|e| unavailable(format!("failed to create CSV: {e}")))?;
    writer
        .write_record(["x", "y"])
        .map_err(|e| unavailable(format!("failed to write CSV header: {e}")))?;
    for (x, y) in samples.x().iter().zip(samples.y()) {
        // `{}` on f64 prints the shortest representation that parses back exactly.
        writer
            .write_record([x.to_string(), y.to_string()])
            .map_err(|e| unavailable(format!("failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| unavailable(format!("failed to flush CSV: {e}")))?;
    Ok(())
}
