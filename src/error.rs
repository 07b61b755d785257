//! Error types.
//!
//! - [`FitError`]: typed failures raised by the library (ingest, validation,
//!   optimizer configuration, local polish).
//! - [`AppError`]: what the binary reports; carries the process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Library-level failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// The input file is missing, unreadable, or not valid CSV.
    #[error("input unavailable: '{}': {reason}", path.display())]
    InputUnavailable { path: PathBuf, reason: String },

    /// A required column is absent from the CSV header.
    #[error("missing required column `{column}` in '{}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A cell could not be parsed as a finite number.
    #[error("line {line}: column `{column}` has invalid value '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },

    /// The sample set has no rows.
    #[error("no samples to fit")]
    EmptySamples,

    /// Observed x/y and parameter positions have different lengths.
    #[error("shape mismatch: x has {x} values, y has {y}, positions have {t}")]
    ShapeMismatch { x: usize, y: usize, t: usize },

    /// A bound pair is not finite or not ordered.
    #[error("invalid bounds for parameter {index}: [{lower}, {upper}]")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    /// An optimizer option is out of its valid range.
    #[error("invalid optimizer option `{name}` = {value}: {reason}")]
    InvalidOption {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A parameter vector does not match the bounds' dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The local refinement step failed inside the solver.
    #[error("local polish failed: {0}")]
    Polish(String),
}

impl FitError {
    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InputUnavailable { .. }
            | FitError::MissingColumn { .. }
            | FitError::InvalidValue { .. }
            | FitError::InvalidBounds { .. }
            | FitError::InvalidOption { .. } => 2,
            FitError::EmptySamples | FitError::ShapeMismatch { .. } => 3,
            FitError::DimensionMismatch { .. } | FitError::Polish(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_error_maps_to_exit_codes() {
        let missing = FitError::InputUnavailable {
            path: PathBuf::from("nope.csv"),
            reason: "not found".to_string(),
        };
        let app: AppError = missing.into();
        assert_eq!(app.exit_code(), 2);
        assert!(app.to_string().contains("nope.csv"));

        let shape: AppError = FitError::ShapeMismatch { x: 3, y: 2, t: 3 }.into();
        assert_eq!(shape.exit_code(), 3);
        assert!(shape.to_string().contains("y has 2"));
    }
}
