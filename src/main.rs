//! sim-sqlite - Simulation output database initializer
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use sim_sqlite::config::{CliArgs, OutputConfig};
use sim_sqlite::{EnvironmentKind, SimulationInfo, SqlOutput};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Simulation row written by the CLI
const SIMULATION_ID: i32 = 1;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.verbose)?;

    let config = OutputConfig::from_args(&args).context("Invalid configuration")?;
    let db_path = config.db_path.clone();

    let mut output = SqlOutput::open(config).context("Failed to open output database")?;
    if !output.write_output_enabled() {
        info!("Nothing to write");
        return Ok(());
    }

    output.begin()?;
    output
        .create_simulations_record(
            SIMULATION_ID,
            &SimulationInfo {
                program_version: args.program_version.clone(),
                timestamp: None,
                timesteps_per_hour: args.timesteps_per_hour,
            },
        )
        .context("Failed to record simulation")?;

    if let Some(ref name) = args.environment {
        output
            .create_environment_period_record(1, name, EnvironmentKind::RunPeriodWeather)
            .context("Failed to record environment period")?;
    }

    output.update_simulation_record(true, true)?;
    output.commit()?;

    let messages = output.diagnostics_count();
    output.finish().context("Failed to finalize output database")?;

    info!(
        path = %db_path.display(),
        messages,
        "Output database ready"
    );
    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("sim_sqlite=debug,warn")
    } else {
        EnvFilter::new("sim_sqlite=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
