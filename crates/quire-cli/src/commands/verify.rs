//! Verify command - check the integrity of a sequence.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use colored::Colorize;
use quire_audit::ChainVerificationResult;
use quire_config::Config;
use quire_crypto::{PublicKey, SignatureVerifier};

use super::{open_sequence, required};
use crate::theme::Theme;

/// Arguments for `quire verify`.
#[derive(Debug, Default, Args)]
pub(crate) struct VerifyArgs {
    /// Sequence file to verify
    #[arg(short, long)]
    pub(crate) sequence: Option<PathBuf>,

    /// Also require every signer to be listed in `trust.peers`
    #[arg(long)]
    pub(crate) trusted: bool,
}

/// Verify a sequence file. Returns whether the sequence is valid.
pub(crate) fn verify_sequence(args: VerifyArgs, config: &Config) -> anyhow::Result<bool> {
    let path: PathBuf = required(
        args.sequence,
        config.sequence.path.as_deref(),
        "sequence",
        "sequence.path",
    )?;
    let sequence = open_sequence(&path)?;

    let result = if args.trusted || config.trust.require_trusted {
        sequence.verify_trusted(&trusted_verifier(&config.trust.peers)?)
    } else {
        sequence.verify()
    };

    report(&path, &result);
    Ok(result.valid)
}

fn trusted_verifier(peers: &[String]) -> anyhow::Result<SignatureVerifier> {
    if peers.is_empty() {
        bail!("trusted verification needs at least one key in trust.peers");
    }
    let keys = peers
        .iter()
        .map(|hex| {
            PublicKey::from_hex(hex).with_context(|| format!("invalid trusted peer key {hex}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(SignatureVerifier::from_keys(keys))
}

fn report(path: &Path, result: &ChainVerificationResult) {
    if result.valid {
        println!(
            "{}",
            Theme::success(&format!(
                "{} verified: {} actions, no violations",
                path.display(),
                result.entries_verified
            ))
        );
        return;
    }

    println!(
        "{}",
        Theme::error(&format!(
            "{} is NOT valid: {} of {} actions violate the chain",
            path.display(),
            result.violations.len(),
            result.entries_verified
        ))
    );
    for violation in &result.violations {
        println!("  {} {violation}", "-".red());
    }
}
