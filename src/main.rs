mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use housekeeper::sources::{self, ConfigLocation};
use housekeeper::{Engine, Output};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level picked by `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let location = ConfigLocation::from_arg(cli.config.as_deref())?;
    let mut out = Output::stdout(cli.silent);

    let mut jobs = sources::load(&location, &mut out).context("Failed to read job definitions")?;
    if !cli.jobs.is_empty() {
        for unknown in jobs.retain_named(&cli.jobs) {
            tracing::warn!(job = %unknown, "No such job in configuration");
        }
    }

    let engine = Engine::new(cli.run_options());
    let summary = engine.run(&jobs, &mut out)?;

    for failure in &summary.failures {
        tracing::warn!(job = %failure.job, "Job did not complete");
    }
    Ok(())
}
