//! Numeric helpers: parameter grids and summary statistics.

pub mod spacing;
pub mod stats;

pub use spacing::*;
pub use stats::*;
