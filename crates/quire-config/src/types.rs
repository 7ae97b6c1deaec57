//! Configuration types for the quire CLI.
//!
//! Every section implements [`Default`] so that a bare `[section]` header in
//! TOML produces a working configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The local peer's identity.
    pub peer: PeerSection,
    /// The group actions are recorded for.
    pub group: GroupSection,
    /// Where the sequence lives.
    pub sequence: SequenceSection,
    /// Signers accepted by `verify --trusted`.
    pub trust: TrustSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// The local peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerSection {
    /// Display name, used only in CLI output.
    pub name: String,
    /// Path to the peer's secp256k1 secret key (hex).
    pub key_file: Option<String>,
}

impl Default for PeerSection {
    fn default() -> Self {
        Self {
            name: "anonymous".to_owned(),
            key_file: None,
        }
    }
}

/// The group actions are recorded on behalf of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSection {
    /// Group id bound into every record.
    pub id: Option<String>,
    /// Path to the group's AES-256 key (hex).
    pub key_file: Option<String>,
}

/// Sequence file location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceSection {
    /// Path to the sequence file.
    pub path: Option<String>,
}

/// Trusted signers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustSection {
    /// Compressed public keys (hex, 33 bytes) of trusted peers.
    pub peers: Vec<String>,
    /// Make `verify` check signers against `peers` without `--trusted`.
    pub require_trusted: bool,
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["quire_audit=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
