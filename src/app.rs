//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging on stderr
//! - runs the fit pipeline or the synthetic generator
//! - prints the report

use clap::Parser;
use tracing::{info, level_filters::LevelFilter};

use crate::cli::{Cli, Command, FitArgs, GenerateArgs};
use crate::domain::{CurveParams, FitConfig, OutputFormat, ParamBounds};
use crate::error::AppError;
use crate::io::{SyntheticSpec, generate_samples, write_samples_csv};
use crate::optim::DeOptions;
use crate::report::{FitReport, format_report, format_report_json};

pub mod pipeline;

/// Exit code when the input could not be loaded.
const NO_DATA_EXIT_CODE: u8 = 3;

/// Entry point for the `spiral-fit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Fit(args) => handle_fit(&args),
        Command::Generate(args) => handle_generate(&args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    // `try_init` so repeated calls (tests) don't panic.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args);
    let Some(run) = pipeline::run_fit(&config)? else {
        return Err(AppError::new(
            NO_DATA_EXIT_CODE,
            format!("No samples loaded from '{}'; nothing to fit.", config.input.display()),
        ));
    };

    let report = FitReport::new(&run.samples, &run.fit);
    match config.output {
        OutputFormat::Text => print!("{}", format_report(&report)),
        OutputFormat::Json => println!("{}", format_report_json(&report)?),
    }
    Ok(())
}

fn handle_generate(args: &GenerateArgs) -> Result<(), AppError> {
    let spec = SyntheticSpec {
        params: CurveParams::new(args.theta, args.m, args.x),
        n_samples: args.samples,
        noise_sd: args.noise,
        seed: args.seed,
    };
    let samples = generate_samples(&spec)?;
    write_samples_csv(&args.output, &samples)?;
    info!(path = %args.output.display(), n = samples.len(), "wrote synthetic samples");
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: args.input.clone(),
        bounds: ParamBounds::default(),
        optimizer: DeOptions {
            strategy: args.strategy,
            max_generations: args.max_generations,
            popsize: args.popsize,
            tol: args.tol,
            atol: args.atol,
            recombination: args.recombination,
            mutation: (args.mutation_min, args.mutation_max),
            init: args.init,
            polish: !args.no_polish,
            seed: args.seed,
            log_every: args.log_every,
        },
        output: args.format,
    }
}
