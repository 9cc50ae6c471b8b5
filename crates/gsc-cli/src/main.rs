use anyhow::Result;
use clap::Parser;
use gsc_cli::{load_config, Cli, Commands, GscConfig};
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::{batch, export, generate, solve, solvers};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let level = match cli.log_level.map(Ok).unwrap_or_else(|| config.logging.level()) {
        Ok(level) => level,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so JSON on stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install log subscriber: {err}");
    }
    debug!(?config, "loaded configuration");

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &GscConfig) -> Result<()> {
    match &cli.command {
        Commands::Generate { size, out } => generate::handle(size, out.as_deref(), config),
        Commands::Solve {
            input,
            solver,
            format,
            json,
            csv,
        } => solve::handle(
            input,
            solver,
            solve::SolveOutputs {
                format: *format,
                json: json.as_deref(),
                csv: csv.as_deref(),
            },
            config,
        ),
        Commands::Export { input, format, out } => {
            export::handle(input, *format, out.as_deref(), config)
        }
        Commands::Batch {
            size,
            solver,
            runs,
            seed_start,
            threads,
            out,
            write_results,
        } => batch::handle(
            size,
            solver,
            batch::BatchOptions {
                runs: *runs,
                seed_start: *seed_start,
                threads: *threads,
                out: out.clone(),
                write_results: *write_results,
            },
            config,
        ),
        Commands::Solvers => solvers::handle(&config.solver.backend),
    }
}
