//! HyperX Cloud III S battery query CLI
//!
//! Reads battery level and charging state from the wireless dongle.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hyperx_battery::AppConfig;

mod cli;
use cli::{Cli, Commands};

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.resolved_command();

    // Initialize logging
    let verbose = matches!(&command, Commands::Battery(args) if args.verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli, command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, command: Commands) -> Result<ExitCode> {
    // Load config
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    debug!("Loading config from {:?}", config_path);
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?
        .merge(cli.overrides(&command));
    info!(
        "Device {:04X}:{:04X}, timeout {}ms",
        config.vid, config.pid, config.timeout_ms
    );

    match command {
        Commands::Battery(args) => commands::battery::battery(&config, &args),
        Commands::List { all } => commands::utility::list(&config, all),
        Commands::Config { save } => commands::utility::config(&config, &config_path, save),
    }
}
