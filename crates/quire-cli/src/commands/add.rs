//! Add command - append an encrypted, signed action to a sequence.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use quire_audit::{FileSequenceStore, GroupId, SequenceStore};
use quire_config::Config;
use quire_crypto::{GroupKey, KeyPair};
use tracing::info;

use super::required;
use crate::theme::Theme;

/// Arguments for `quire add`.
#[derive(Debug, Default, Args)]
pub(crate) struct AddArgs {
    /// Name of the peer performing the action (display only)
    #[arg(short, long)]
    pub(crate) peer: Option<String>,

    /// File containing the peer's secret key
    #[arg(long, visible_alias = "pk")]
    pub(crate) peer_key: Option<PathBuf>,

    /// Group the action is performed on behalf of
    #[arg(short, long)]
    pub(crate) group: Option<String>,

    /// File containing the group's symmetric key
    #[arg(long, visible_alias = "gk")]
    pub(crate) group_key: Option<PathBuf>,

    /// Sequence file (created if it does not exist)
    #[arg(short, long)]
    pub(crate) sequence: Option<PathBuf>,

    /// Action to append
    #[arg(short, long)]
    pub(crate) action: String,
}

/// Append one action and save the sequence. Returns the new record's index.
pub(crate) fn add_action(args: AddArgs, config: &Config) -> anyhow::Result<usize> {
    let peer = args.peer.unwrap_or_else(|| config.peer.name.clone());
    let peer_key_path: PathBuf = required(
        args.peer_key,
        config.peer.key_file.as_deref(),
        "peer-key",
        "peer.key_file",
    )?;
    let group: String = required(args.group, config.group.id.as_deref(), "group", "group.id")?;
    let group_key_path: PathBuf = required(
        args.group_key,
        config.group.key_file.as_deref(),
        "group-key",
        "group.key_file",
    )?;
    let sequence_path: PathBuf = required(
        args.sequence,
        config.sequence.path.as_deref(),
        "sequence",
        "sequence.path",
    )?;

    let keypair = KeyPair::load(&peer_key_path)
        .with_context(|| format!("failed to load peer key from {}", peer_key_path.display()))?;
    let group_key = GroupKey::load(&group_key_path)
        .with_context(|| format!("failed to load group key from {}", group_key_path.display()))?;
    let group_id = GroupId::new(group)?;

    let store = FileSequenceStore::new(&sequence_path);
    if !store.exists()? {
        println!(
            "{}",
            Theme::info(&format!(
                "{} does not exist, starting a new sequence",
                sequence_path.display()
            ))
        );
    }
    let mut sequence = store
        .load_or_empty()
        .with_context(|| format!("failed to load sequence from {}", sequence_path.display()))?;

    let index = sequence.append(args.action.as_bytes(), &keypair, &group_id, &group_key)?;
    store
        .save(&sequence)
        .with_context(|| format!("failed to save sequence to {}", sequence_path.display()))?;

    info!(
        index,
        group = %group_id,
        key_id = %keypair.key_id_hex(),
        "Appended action"
    );
    println!(
        "{}",
        Theme::success(&format!(
            "Peer {peer} ({}) added action #{index} on behalf of group {group_id}",
            Theme::key_id(&keypair.key_id_hex())
        ))
    );
    println!("{}", Theme::kv("Sequence", &sequence_path.display().to_string()));

    Ok(index)
}

#[cfg(test)]
mod tests {
    use quire_audit::SequenceStore;
    use quire_test::{TestContext, test_group_key, test_keypair};

    use super::*;

    fn write_keys(ctx: &TestContext) -> KeyPair {
        let keypair = test_keypair();
        keypair.save(ctx.peer_key_path()).unwrap();
        test_group_key().save(ctx.group_key_path()).unwrap();
        keypair
    }

    fn args(ctx: &TestContext, action: &str) -> AddArgs {
        AddArgs {
            peer: Some("alice".into()),
            peer_key: Some(ctx.peer_key_path()),
            group: Some("ops".into()),
            group_key: Some(ctx.group_key_path()),
            sequence: Some(ctx.sequence_path()),
            action: action.into(),
        }
    }

    #[test]
    fn test_add_creates_sequence() {
        let ctx = TestContext::new();
        let keypair = write_keys(&ctx);

        assert_eq!(add_action(args(&ctx, "a"), &Config::default()).unwrap(), 0);
        assert_eq!(add_action(args(&ctx, "b"), &Config::default()).unwrap(), 1);

        let sequence = FileSequenceStore::new(ctx.sequence_path()).load().unwrap();
        assert_eq!(sequence.len(), 2);
        assert!(sequence.verify().valid);
        assert_eq!(
            sequence.get(1).unwrap().public_key(),
            keypair.public_key().as_bytes()
        );
        assert_eq!(sequence.get(0).unwrap().group_id().as_str(), "ops");
    }

    #[test]
    fn test_add_falls_back_to_config() {
        let ctx = TestContext::new();
        write_keys(&ctx);

        let mut config = Config::default();
        config.peer.key_file = Some(ctx.peer_key_path().display().to_string());
        config.group.id = Some("configured".into());
        config.group.key_file = Some(ctx.group_key_path().display().to_string());
        config.sequence.path = Some(ctx.sequence_path().display().to_string());

        let args = AddArgs {
            action: "from config".into(),
            ..AddArgs::default()
        };
        assert_eq!(add_action(args, &config).unwrap(), 0);

        let sequence = FileSequenceStore::new(ctx.sequence_path()).load().unwrap();
        assert_eq!(sequence.get(0).unwrap().group_id().as_str(), "configured");
    }

    #[test]
    fn test_add_missing_group_key_fails() {
        let ctx = TestContext::new();
        test_keypair().save(ctx.peer_key_path()).unwrap();

        let err = add_action(args(&ctx, "a"), &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load group key"));
        assert!(!ctx.sequence_path().exists());
    }

    #[test]
    fn test_add_rejects_delimiter_in_group() {
        let ctx = TestContext::new();
        write_keys(&ctx);

        let mut bad = args(&ctx, "a");
        bad.group = Some("a|b".into());
        assert!(add_action(bad, &Config::default()).is_err());
        assert!(!ctx.sequence_path().exists());
    }
}
