//! Quarry CLI - run plugin phases from a config file.
//!
//! `quarry run` loads the configuration, sets up logging, builds the hook
//! map and processes every configured plugin phase in order. `quarry list`
//! shows what each phase would load without running anything.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use quarry_config::Config;
use quarry_config::loader::{apply_env_overrides, collect_env_vars};

mod builtins;
mod commands;
mod config_bridge;

/// Config file used when `--conf` is not given and it exists.
const DEFAULT_CONFIG: &str = "quarry.toml";

/// Quarry - plugin orchestrator
#[derive(Parser)]
#[command(name = "quarry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file to use
    #[arg(long, global = true, env = "QUARRY_CONFIG")]
    conf: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every configured plugin phase (default)
    Run,

    /// List hook and plugin packages without running them
    List,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli
        .conf
        .clone()
        .or_else(|| Path::new(DEFAULT_CONFIG).is_file().then(|| PathBuf::from(DEFAULT_CONFIG)));
    let config = load_config(config_path.as_deref())?;

    let mut log_config = config_bridge::to_log_config(&config);
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = quarry_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    info!(
        "Running {} version {}",
        config.app.name,
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) => info!("Using configuration file: {}", path.display()),
        None => info!("Using built-in configuration"),
    }
    debug!(verbose = cli.verbose, conf = ?cli.conf, "Args");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let ok = commands::run::run_phases(&config)?;
            Ok(if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        },
        Commands::List => {
            commands::list::list_packages(&config)?;
            Ok(ExitCode::SUCCESS)
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let mut config = Config::defaults().context("failed to load built-in config")?;
    apply_env_overrides(&mut config, &collect_env_vars());
    quarry_config::validate::validate(&config).context("invalid configuration")?;
    Ok(config)
}
