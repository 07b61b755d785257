//! Curve model implementation.
//!
//! The model is a small, pure function so that loss and search code can stay
//! generic over parameter vectors.

pub mod model;

pub use model::*;
