//! Curve fitting.
//!
//! Responsibilities:
//!
//! - score a candidate against the samples (L1 loss)
//! - hand the loss to a global minimizer and map the winner back to curve
//!   parameters

pub mod fitter;
pub mod loss;

pub use fitter::*;
pub use loss::*;
