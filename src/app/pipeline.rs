//! The fit workflow: load samples, run the global search, return what the
//! report needs.
//!
//! Kept apart from `app` so it can be driven from tests without a process.

use tracing::info;

use crate::domain::{FitConfig, FitResult, SampleSet};
use crate::error::AppError;
use crate::fit::find_optimal_parameters;
use crate::io::try_load_samples;
use crate::optim::DifferentialEvolution;

/// All computed outputs of a single `spiral-fit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub samples: SampleSet,
    pub fit: FitResult,
}

/// Execute the fit pipeline.
///
/// Returns `Ok(None)` when the input cannot be loaded; the cause has already
/// been logged.
pub fn run_fit(config: &FitConfig) -> Result<Option<RunOutput>, AppError> {
    let Some(samples) = try_load_samples(&config.input) else {
        return Ok(None);
    };
    info!(path = %config.input.display(), n = samples.len(), "loaded samples");

    let minimizer = DifferentialEvolution::new(config.optimizer.clone());
    let fit = find_optimal_parameters(&samples, &config.bounds, &minimizer)?;

    Ok(Some(RunOutput { samples, fit }))
}
