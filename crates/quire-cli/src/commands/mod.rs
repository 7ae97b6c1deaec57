//! Subcommand implementations.

pub(crate) mod add;
pub(crate) mod config;
pub(crate) mod decrypt;
pub(crate) mod group_key;
pub(crate) mod keys;
pub(crate) mod list;
pub(crate) mod verify;

use std::path::Path;

use anyhow::{Context, anyhow};
use quire_audit::{FileSequenceStore, PeerActionSequence, SequenceStore};

use crate::theme::Theme;

/// Take the flag value, or fall back to the configured one.
pub(crate) fn required<T>(
    flag: Option<T>,
    configured: Option<&str>,
    flag_name: &str,
    config_key: &str,
) -> anyhow::Result<T>
where
    T: for<'a> From<&'a str>,
{
    flag.or_else(|| configured.map(T::from))
        .ok_or_else(|| anyhow!("missing --{flag_name} (or set {config_key} in the config)"))
}

/// Load an existing sequence file.
pub(crate) fn open_sequence(path: &Path) -> anyhow::Result<PeerActionSequence> {
    FileSequenceStore::new(path)
        .load()
        .with_context(|| format!("failed to load sequence from {}", path.display()))
}

/// Ask before replacing an existing key file. `true` means go ahead.
pub(crate) fn confirm_overwrite(path: &Path, force: bool, consequence: &str) -> anyhow::Result<bool> {
    if force || !path.exists() {
        return Ok(true);
    }

    println!(
        "{}",
        Theme::warning(&format!("{} already exists. This will replace it.", path.display()))
    );
    println!("{}", Theme::warning(consequence));
    println!();

    let confirm = dialoguer::Confirm::new()
        .with_prompt("Replace existing key?")
        .default(false)
        .interact()?;

    if !confirm {
        println!("{}", Theme::info("Aborted."));
    }
    Ok(confirm)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_required_prefers_flag() {
        let value: PathBuf =
            required(Some(PathBuf::from("a.pas")), Some("b.pas"), "sequence", "sequence.path")
                .unwrap();
        assert_eq!(value, PathBuf::from("a.pas"));
    }

    #[test]
    fn test_required_falls_back_to_config() {
        let value: String = required(None, Some("ops"), "group", "group.id").unwrap();
        assert_eq!(value, "ops");
    }

    #[test]
    fn test_required_missing_names_both_sources() {
        let err = required::<String>(None, None, "group", "group.id").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("--group"));
        assert!(msg.contains("group.id"));
    }

    #[test]
    fn test_open_missing_sequence_fails() {
        let dir = quire_test::test_dir();
        let path = dir.path().join("missing.pas");
        let err = open_sequence(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load sequence"));
    }

    #[test]
    fn test_confirm_overwrite_without_existing_file() {
        let dir = quire_test::test_dir();
        assert!(confirm_overwrite(&dir.path().join("new.key"), false, "").unwrap());
    }
}
