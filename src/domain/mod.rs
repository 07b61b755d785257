//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - curve parameters and their box constraints (`CurveParams`, `ParamBounds`)
//! - the observed sample set (`SampleSet`)
//! - run configuration and fit outputs (`FitConfig`, `FitResult`)

pub mod types;

pub use types::*;
