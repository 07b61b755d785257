//! Command-line parsing for the spiral curve fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting/math code. `app` turns these structs into a [`crate::domain::FitConfig`].

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{InitMethod, OutputFormat, Strategy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "spiral-fit",
    version,
    about = "Fit an exponentially modulated sinusoidal curve to (x, y) samples under L1 loss"
)]
pub struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit theta, M and X to an `x,y` CSV and print the report.
    Fit(FitArgs),
    /// Write a synthetic `x,y` CSV sampled from known parameters.
    Generate(GenerateArgs),
}

/// Options for `spiral-fit fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// CSV file with `x` and `y` columns.
    #[arg(value_name = "CSV", default_value = "xy_data.csv")]
    pub input: PathBuf,

    /// RNG seed for the global search (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum number of generations.
    #[arg(long, default_value_t = 3000)]
    pub max_generations: usize,

    /// Population size multiplier (members = popsize * 3).
    #[arg(long, default_value_t = 50)]
    pub popsize: usize,

    /// Relative convergence tolerance.
    #[arg(long, default_value_t = 1e-9)]
    pub tol: f64,

    /// Absolute convergence tolerance.
    #[arg(long, default_value_t = 0.0)]
    pub atol: f64,

    /// Crossover probability.
    #[arg(long, default_value_t = 0.8)]
    pub recombination: f64,

    /// Lower end of the dithered mutation scale.
    #[arg(long, default_value_t = 0.5)]
    pub mutation_min: f64,

    /// Upper end of the dithered mutation scale.
    #[arg(long, default_value_t = 1.0)]
    pub mutation_max: f64,

    /// Mutation strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Best1Bin)]
    pub strategy: Strategy,

    /// Initial population layout.
    #[arg(long, value_enum, default_value_t = InitMethod::LatinHypercube)]
    pub init: InitMethod,

    /// Skip the Nelder-Mead refinement of the winner.
    #[arg(long)]
    pub no_polish: bool,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log search progress every N generations (0 disables).
    #[arg(long, default_value_t = 100)]
    pub log_every: usize,
}

/// Options for `spiral-fit generate`.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Rotation angle in degrees.
    #[arg(long, default_value_t = 15.0)]
    pub theta: f64,

    /// Exponential growth rate.
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.01)]
    pub m: f64,

    /// Horizontal offset.
    #[arg(long, default_value_t = 10.0)]
    pub x: f64,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 1500)]
    pub samples: usize,

    /// Standard deviation of Gaussian noise added to both coordinates.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Noise seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV path.
    #[arg(short, long, value_name = "CSV", default_value = "xy_data.csv")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_match_optimizer_defaults() {
        let cli = Cli::try_parse_from(["spiral-fit", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input, PathBuf::from("xy_data.csv"));
        assert_eq!(args.max_generations, 3000);
        assert_eq!(args.popsize, 50);
        assert_eq!(args.tol, 1e-9);
        assert_eq!(args.recombination, 0.8);
        assert_eq!(args.strategy, Strategy::Best1Bin);
        assert_eq!(args.init, InitMethod::LatinHypercube);
        assert!(!args.no_polish);
        assert_eq!(args.seed, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_strategy_and_global_verbosity() {
        let cli = Cli::try_parse_from([
            "spiral-fit", "fit", "data.csv", "--strategy", "rand1bin", "--seed", "7", "--format", "json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert_eq!(args.strategy, Strategy::Rand1Bin);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn generate_accepts_negative_growth() {
        let cli = Cli::try_parse_from(["spiral-fit", "generate", "--m", "-0.02", "-n", "50", "-o", "out.csv"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.m, -0.02);
        assert_eq!(args.samples, 50);
        assert_eq!(args.output, PathBuf::from("out.csv"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["spiral-fit", "-q", "-v", "fit"]).is_err());
    }
}
