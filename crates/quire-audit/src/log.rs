//! Peer-action sequence - the chain manager.
//!
//! Owns an ordered list of records, appends new ones chained to the current
//! last entry, verifies the whole chain and converts it to and from the
//! line-per-record text format.

use std::fmt;
use std::str::FromStr;

use quire_crypto::{GroupKey, KeyPair, SignatureVerifier};
use tracing::{debug, warn};

use crate::entry::PeerAction;
use crate::error::{AuditError, AuditResult};
use crate::group::GroupId;

/// An append-only chain of peer actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerActionSequence {
    entries: Vec<PeerAction>,
}

impl PeerActionSequence {
    /// Create an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Encrypt `payload` under the group key and append it as a new record.
    ///
    /// Returns the index of the new record. On error the sequence is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Crypto`] if encryption fails or
    /// [`AuditError::Signing`] if signing fails.
    pub fn append(
        &mut self,
        payload: &[u8],
        signing_key: &KeyPair,
        group_id: &GroupId,
        group_key: &GroupKey,
    ) -> AuditResult<usize> {
        let encrypted = quire_crypto::encrypt(payload, group_key)?;
        self.append_raw(encrypted, signing_key, group_id)
    }

    /// Append `data` as the record payload without encrypting it.
    ///
    /// Returns the index of the new record. On error the sequence is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Signing`] if signing fails.
    pub fn append_raw(
        &mut self,
        data: Vec<u8>,
        signing_key: &KeyPair,
        group_id: &GroupId,
    ) -> AuditResult<usize> {
        let action = PeerAction::create(data, group_id.clone(), self.last(), signing_key)?;
        let index = self.entries.len();

        debug!(
            index,
            group = %group_id,
            signer = %signing_key.key_id_hex(),
            "Appending peer action"
        );

        self.entries.push(action);
        Ok(index)
    }

    /// Verify every record against its predecessor.
    ///
    /// Does not stop at the first failure: every failing index is reported.
    #[must_use]
    pub fn verify(&self) -> ChainVerificationResult {
        self.check(None)
    }

    /// Like [`verify`](Self::verify), but also flags records whose signer is
    /// not in `verifier`'s trusted set.
    #[must_use]
    pub fn verify_trusted(&self, verifier: &SignatureVerifier) -> ChainVerificationResult {
        self.check(Some(verifier))
    }

    fn check(&self, verifier: Option<&SignatureVerifier>) -> ChainVerificationResult {
        let mut violations = Vec::new();
        let mut previous: Option<&PeerAction> = None;

        for (index, action) in self.entries.iter().enumerate() {
            let kind = match (action.verify_digest(previous), verifier) {
                (false, _) => Some(ViolationKind::InvalidDigest),
                (true, Some(verifier)) if !verifier.is_trusted_key(action.public_key()) => {
                    Some(ViolationKind::UntrustedSigner)
                },
                (true, _) => None,
            };

            if let Some(kind) = kind {
                warn!(
                    index,
                    group = %action.group_id(),
                    signer = %action.signer_id_hex(),
                    %kind,
                    "Chain violation"
                );
                violations.push(Violation {
                    index,
                    action: action.clone(),
                    kind,
                });
            }
            previous = Some(action);
        }

        ChainVerificationResult {
            valid: violations.is_empty(),
            entries_verified: self.entries.len(),
            violations,
        }
    }

    /// Encode the sequence as text, one newline-terminated line per record.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Decode a sequence from text produced by [`serialize`](Self::serialize).
    ///
    /// Empty text yields an empty sequence. Every line must decode; there is
    /// no partial result.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::MalformedLine`] for the first line that fails to
    /// decode.
    pub fn deserialize(text: &str) -> AuditResult<Self> {
        let entries = text
            .lines()
            .enumerate()
            .map(|(number, line)| {
                PeerAction::decode(line).map_err(|source| AuditError::MalformedLine {
                    line: number.saturating_add(1),
                    source,
                })
            })
            .collect::<AuditResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Decrypt every payload in order.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Crypto`] for the first payload that fails to decrypt.
    pub fn decrypt_all(&self, group_key: &GroupKey) -> AuditResult<Vec<Vec<u8>>> {
        self.entries
            .iter()
            .map(|action| action.decrypt(group_key))
            .collect()
    }

    /// Get a record by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PeerAction> {
        self.entries.get(index)
    }

    /// The most recent record, `None` when empty.
    #[must_use]
    pub fn last(&self) -> Option<&PeerAction> {
        self.entries.last()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sequence has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate records in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, PeerAction> {
        self.entries.iter()
    }

    /// All records in chain order.
    #[must_use]
    pub fn entries(&self) -> &[PeerAction] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a PeerActionSequence {
    type Item = &'a PeerAction;
    type IntoIter = std::slice::Iter<'a, PeerAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for PeerActionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.entries {
            writeln!(f, "{action}")?;
        }
        Ok(())
    }
}

impl FromStr for PeerActionSequence {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s)
    }
}

/// Result of chain verification.
#[derive(Debug, Clone)]
pub struct ChainVerificationResult {
    /// Whether the chain is valid.
    pub valid: bool,
    /// Number of entries checked.
    pub entries_verified: usize,
    /// Violations in index order (empty if valid).
    pub violations: Vec<Violation>,
}

impl ChainVerificationResult {
    /// Indices of the failing records.
    #[must_use]
    pub fn violation_indices(&self) -> Vec<usize> {
        self.violations.iter().map(|v| v.index).collect()
    }
}

/// A record that failed verification.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Position in the sequence.
    pub index: usize,
    /// The offending record.
    pub action: PeerAction,
    /// What failed.
    pub kind: ViolationKind,
}

/// Kind of verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The signature does not cover the recomputed hash.
    InvalidDigest,
    /// The signature is valid but the signer is not trusted.
    UntrustedSigner,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDigest => f.write_str("invalid digest"),
            Self::UntrustedSigner => f.write_str("untrusted signer"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at index {} (group {}, signer {})",
            self.kind,
            self.index,
            self.action.group_id(),
            self.action.signer_id_hex()
        )
    }
}
