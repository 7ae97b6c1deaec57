//! Quire CLI - append, verify and inspect peer-action sequences.
//!
//! Every command reads the layered configuration first; flags override the
//! configured values. `verify` exits non-zero when the sequence is invalid.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quire_config::{Config, LoggingSection, ResolvedConfig};
use quire_telemetry::{LogConfig, setup_logging};
use tracing::error;

mod commands;
mod theme;

use commands::add::AddArgs;
use commands::config::ConfigCommands;
use commands::decrypt::DecryptArgs;
use commands::group_key::GroupKeyCommands;
use commands::keys::KeyCommands;
use commands::list::ListArgs;
use commands::verify::VerifyArgs;
use theme::Theme;

/// Quire - tamper-evident, encrypted peer-action sequences
#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the layered configuration
    #[arg(long = "config", global = true, env = "QUIRE_CONFIG")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an action to an existing or new sequence
    Add(AddArgs),

    /// Verify the integrity of a sequence
    Verify(VerifyArgs),

    /// List all the peer-actions in a sequence
    List(ListArgs),

    /// Decrypt action payloads with the group key
    Decrypt(DecryptArgs),

    /// Manage peer signing keys
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Manage group encryption keys
    GroupKey {
        #[command(subcommand)]
        command: GroupKeyCommands,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    VerificationFailed,
}

fn load_config(file: Option<PathBuf>) -> Result<ResolvedConfig> {
    if let Some(path) = file {
        let config = Config::load_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        return Ok(ResolvedConfig {
            config,
            field_sources: std::collections::HashMap::new(),
            loaded_files: vec![path.display().to_string()],
        });
    }

    let workspace_root = std::env::current_dir().ok();
    Config::load(workspace_root.as_deref()).context("failed to load configuration")
}

fn default_log_config(verbose: bool) -> LogConfig {
    LogConfig::new(if verbose { "debug" } else { "warn" })
}

fn log_config(section: Option<&LoggingSection>, verbose: bool) -> Result<LogConfig> {
    let Some(section) = section else {
        return Ok(default_log_config(verbose));
    };
    let mut log_config =
        LogConfig::try_from(section).context("invalid [logging] section in the config")?;
    if verbose {
        "debug".clone_into(&mut log_config.level);
    }
    Ok(log_config)
}

fn run(command: Commands, resolved: &ResolvedConfig) -> Result<Outcome> {
    let config = &resolved.config;
    match command {
        Commands::Add(args) => {
            commands::add::add_action(args, config)?;
        },
        Commands::Verify(args) => {
            if !commands::verify::verify_sequence(args, config)? {
                return Ok(Outcome::VerificationFailed);
            }
        },
        Commands::List(args) => commands::list::list_actions(args, config)?,
        Commands::Decrypt(args) => {
            commands::decrypt::decrypt_actions(args, config)?;
        },
        Commands::Keys { command } => commands::keys::run(command, config)?,
        Commands::GroupKey { command } => commands::group_key::run(command, config)?,
        Commands::Config { command } => commands::config::run(command, resolved)?,
    }
    Ok(Outcome::Success)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let resolved = load_config(cli.config_file);
    let logging = resolved.as_ref().ok().map(|r| &r.config.logging);
    let logging_config = log_config(logging, cli.verbose).unwrap_or_else(|e| {
        eprintln!(
            "{}",
            Theme::warning(&format!("{e:#}, falling back to default logging"))
        );
        default_log_config(cli.verbose)
    });
    if let Err(e) = setup_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match resolved.and_then(|r| run(cli.command, &r)) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::VerificationFailed) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::FAILURE
        },
    }
}
