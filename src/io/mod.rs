//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - synthetic sample generation and CSV writing (`synthetic`)

pub mod ingest;
pub mod synthetic;

pub use ingest::*;
pub use synthetic::*;
