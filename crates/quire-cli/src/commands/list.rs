//! List command - show the records of a sequence.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use quire_audit::PeerAction;
use quire_config::Config;

use super::{open_sequence, required};
use crate::theme::Theme;

/// Arguments for `quire list`.
#[derive(Debug, Default, Args)]
pub(crate) struct ListArgs {
    /// Sequence file to list
    #[arg(short, long)]
    pub(crate) sequence: Option<PathBuf>,

    /// Print records in their stored line format
    #[arg(long)]
    pub(crate) raw: bool,
}

/// Print every record of a sequence.
pub(crate) fn list_actions(args: ListArgs, config: &Config) -> anyhow::Result<()> {
    let path: PathBuf = required(
        args.sequence,
        config.sequence.path.as_deref(),
        "sequence",
        "sequence.path",
    )?;
    let sequence = open_sequence(&path)?;

    if args.raw {
        print!("{sequence}");
        return Ok(());
    }

    if sequence.is_empty() {
        println!("{}", Theme::info("Sequence is empty"));
        return Ok(());
    }

    println!("\n{}", Theme::header("Peer Actions"));
    println!(
        "{:>6}  {:<18} {:<24} {:>9}",
        "INDEX".dimmed(),
        "SIGNER".dimmed(),
        "GROUP".dimmed(),
        "BYTES".dimmed()
    );
    println!("{}", Theme::separator());

    for (index, action) in sequence.iter().enumerate() {
        println!("{}", row(index, action));
    }

    println!();
    println!(
        "{}",
        Theme::dimmed(&format!("{} actions in {}", sequence.len(), path.display()))
    );
    Ok(())
}

fn row(index: usize, action: &PeerAction) -> String {
    format!(
        "{index:>6}  {:<18} {:<24} {:>9}",
        action.signer_id_hex(),
        action.group_id().as_str(),
        action.encrypted_payload().len()
    )
}
