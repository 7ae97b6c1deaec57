//! Config command - inspect the resolved configuration.

use anyhow::bail;
use clap::Subcommand;
use quire_config::{ResolvedConfig, ShowFormat};

/// `quire config` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}

/// Dispatch a `quire config` subcommand.
pub(crate) fn run(command: ConfigCommands, resolved: &ResolvedConfig) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show { format } => {
            print!("{}", show_config(resolved, &format)?);
            Ok(())
        },
    }
}

fn show_config(resolved: &ResolvedConfig, format: &str) -> anyhow::Result<String> {
    let format = match format {
        "toml" => ShowFormat::Toml,
        "json" => ShowFormat::Json,
        other => bail!("unknown format '{other}' (expected toml or json)"),
    };
    Ok(resolved.show(format)?)
}
