//! pcstat - page cache stat
//!
//! Command-line entry point: parses arguments, resolves configuration,
//! initializes tracing and dispatches to the stat flow or a subcommand.

mod cli;
mod commands;
mod config;
mod startup_checks;

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, Level};

use cli::{Args, Commands};
use commands::{command_check, command_config, command_stat};
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr; stdout carries the reports.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level().to_ascii_lowercase().as_str() {
        "off" => None,
        "error" => Some(Level::ERROR),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => Some(Level::WARN),
    };

    let Some(log_level) = log_level else {
        return;
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
        return;
    }

    debug!("Logging initialized with level: {}", config.log_level());
}

/// Helper function to load and validate configuration.
fn load_validated_config(args: &Args) -> Result<Config> {
    let config = resolve_config(args).map_err(|e| anyhow!("failed to load configuration: {}", e))?;
    validate_effective_config(&config).map_err(|e| anyhow!("configuration invalid: {}", e))?;
    Ok(config)
}

/// Main application entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_validated_config(&args)?;

    if args.show_config {
        return show_config(&config, args.config_format.clone()).map_err(|e| anyhow!("{}", e));
    }

    setup_logging(&config);

    if let Some(command) = &args.command {
        return match command {
            Commands::Check { pid } => command_check(*pid, &config),
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), format.clone(), *commented),
        };
    }

    if args.files.is_empty() && args.pid.is_none() {
        Args::command().print_help()?;
        std::process::exit(1);
    }

    command_stat(args.files.clone(), args.pid, &config)
}
