//! Group-key command - create shared symmetric keys for a group.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use quire_config::Config;
use quire_crypto::GroupKey;

use super::{confirm_overwrite, required};
use crate::theme::Theme;

/// `quire group-key` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum GroupKeyCommands {
    /// Generate a new random group key
    Generate {
        /// Where to write the key
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Dispatch a `quire group-key` subcommand.
pub(crate) fn run(command: GroupKeyCommands, config: &Config) -> anyhow::Result<()> {
    match command {
        GroupKeyCommands::Generate { out, force } => {
            let path: PathBuf = required(
                out,
                config.group.key_file.as_deref(),
                "out",
                "group.key_file",
            )?;
            generate_group_key(&path, force).map(|_| ())
        },
    }
}

/// Generate a group key at `path`. Returns `false` if the user declined to
/// overwrite.
pub(crate) fn generate_group_key(path: &Path, force: bool) -> anyhow::Result<bool> {
    if !confirm_overwrite(
        path,
        force,
        "Actions encrypted with the old key can no longer be decrypted with the new one.",
    )? {
        return Ok(false);
    }
    GroupKey::generate()
        .replace(path)
        .with_context(|| format!("failed to write group key to {}", path.display()))?;

    println!("{}", Theme::success("New group key generated."));
    println!("{}", Theme::kv("Key file", &path.display().to_string()));
    println!(
        "{}",
        Theme::dimmed("  Share this file with every peer of the group over a secure channel.")
    );
    Ok(true)
}
