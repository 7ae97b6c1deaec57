//! Keys command - manage the peer's signing identity.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use quire_config::Config;
use quire_crypto::KeyPair;

use super::{confirm_overwrite, required};
use crate::theme::Theme;

/// `quire keys` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum KeyCommands {
    /// Generate a new peer key (prompts if one already exists)
    Generate {
        /// Where to write the secret key
        #[arg(long, visible_alias = "pk")]
        peer_key: Option<PathBuf>,

        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
    /// Show the public key and key ID of a peer key
    Show {
        /// Secret key file to read
        #[arg(long, visible_alias = "pk")]
        peer_key: Option<PathBuf>,
    },
}

/// Dispatch a `quire keys` subcommand.
pub(crate) fn run(command: KeyCommands, config: &Config) -> anyhow::Result<()> {
    let configured = config.peer.key_file.as_deref();
    match command {
        KeyCommands::Generate { peer_key, force } => {
            let path: PathBuf = required(peer_key, configured, "peer-key", "peer.key_file")?;
            generate_key(&path, force).map(|_| ())
        },
        KeyCommands::Show { peer_key } => {
            let path: PathBuf = required(peer_key, configured, "peer-key", "peer.key_file")?;
            show_key(&path).map(|_| ())
        },
    }
}

/// Generate a key at `path`. Returns `None` if the user declined to overwrite.
pub(crate) fn generate_key(path: &Path, force: bool) -> anyhow::Result<Option<KeyPair>> {
    if !confirm_overwrite(
        path,
        force,
        "Sequences signed with the old key will no longer match this identity.",
    )? {
        return Ok(None);
    }
    let keypair = KeyPair::generate();
    keypair
        .replace(path)
        .with_context(|| format!("failed to write peer key to {}", path.display()))?;

    println!("{}", Theme::success("New peer key generated."));
    print_identity(&keypair, path);
    Ok(Some(keypair))
}

/// Print the identity stored at `path`.
pub(crate) fn show_key(path: &Path) -> anyhow::Result<KeyPair> {
    let keypair = KeyPair::load(path)
        .with_context(|| format!("failed to load peer key from {}", path.display()))?;

    println!("\n{}", Theme::header("Peer Identity"));
    print_identity(&keypair, path);
    Ok(keypair)
}

fn print_identity(keypair: &KeyPair, path: &Path) {
    println!("{}", Theme::kv("Key ID", &Theme::key_id(&keypair.key_id_hex())));
    println!("{}", Theme::kv("Public key", &keypair.public_key().to_hex()));
    println!("{}", Theme::kv("Key file", &path.display().to_string()));
    println!();
}
