//! Decrypt command - reveal action payloads with the group key.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;
use quire_audit::PeerActionSequence;
use quire_config::Config;
use quire_crypto::GroupKey;

use super::{open_sequence, required};
use crate::theme::Theme;

/// Arguments for `quire decrypt`.
#[derive(Debug, Default, Args)]
pub(crate) struct DecryptArgs {
    /// Sequence file to read
    #[arg(short, long)]
    pub(crate) sequence: Option<PathBuf>,

    /// File containing the group's symmetric key
    #[arg(long, visible_alias = "gk")]
    pub(crate) group_key: Option<PathBuf>,

    /// Decrypt only the action at this index
    #[arg(short, long)]
    pub(crate) index: Option<usize>,
}

/// Decrypt and print one or all actions. Returns the decrypted payloads.
pub(crate) fn decrypt_actions(
    args: DecryptArgs,
    config: &Config,
) -> anyhow::Result<Vec<(usize, Vec<u8>)>> {
    let path: PathBuf = required(
        args.sequence,
        config.sequence.path.as_deref(),
        "sequence",
        "sequence.path",
    )?;
    let key_path: PathBuf = required(
        args.group_key,
        config.group.key_file.as_deref(),
        "group-key",
        "group.key_file",
    )?;

    let sequence = open_sequence(&path)?;
    let group_key = GroupKey::load(&key_path)
        .with_context(|| format!("failed to load group key from {}", key_path.display()))?;

    let decrypted = match args.index {
        Some(index) => vec![(index, decrypt_one(&sequence, index, &group_key)?)],
        None => decrypt_every(&sequence, &group_key)?,
    };

    for (index, payload) in &decrypted {
        println!(
            "{} {}",
            Theme::dimmed(&format!("#{index:<4}")),
            String::from_utf8_lossy(payload)
        );
    }
    Ok(decrypted)
}

fn decrypt_one(
    sequence: &PeerActionSequence,
    index: usize,
    group_key: &GroupKey,
) -> anyhow::Result<Vec<u8>> {
    let Some(action) = sequence.get(index) else {
        bail!(
            "no action at index {index} (sequence has {} actions)",
            sequence.len()
        );
    };
    action
        .decrypt(group_key)
        .with_context(|| format!("failed to decrypt action #{index}"))
}

fn decrypt_every(
    sequence: &PeerActionSequence,
    group_key: &GroupKey,
) -> anyhow::Result<Vec<(usize, Vec<u8>)>> {
    let mut decrypted = Vec::with_capacity(sequence.len());
    let mut failed = 0usize;

    for (index, action) in sequence.iter().enumerate() {
        match action.decrypt(group_key) {
            Ok(payload) => decrypted.push((index, payload)),
            Err(e) => {
                failed = failed.saturating_add(1);
                println!("{}", Theme::error(&format!("#{index}: {e}")));
            },
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} actions could not be decrypted with this group key",
            sequence.len()
        );
    }
    Ok(decrypted)
}
