//! `spiral-fit` library crate.
//!
//! The binary (`spiral-fit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the optimizer and the model can be reused independently

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod optim;
pub mod report;
