//! Audit-related error types.

use quire_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur with peer-action sequences.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Encryption, decryption or key error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The signature primitive failed while building a record.
    #[error("signing error: {0}")]
    Signing(#[source] CryptoError),

    /// A line of a sequence file could not be decoded.
    #[error("malformed record on line {line}: {source}")]
    MalformedLine {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: FormatError,
    },

    /// Group id rejected at construction.
    #[error("invalid group id {group_id:?}: {reason}")]
    InvalidGroupId {
        /// The rejected id.
        group_id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// A thread panicked while holding the sequence lock.
    #[error("sequence lock poisoned")]
    LockPoisoned,
}

/// Errors decoding a single record line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Wrong number of `|`-separated fields.
    #[error("expected {expected} fields, found {actual}")]
    FieldCount {
        /// Required field count.
        expected: usize,
        /// Fields present in the line.
        actual: usize,
    },

    /// A base64 field did not decode.
    #[error("field {field} is not valid base64")]
    InvalidBase64 {
        /// Zero-based field index.
        field: usize,
    },

    /// The public key field did not decode as hex.
    #[error("public key is not valid hex")]
    InvalidHex,

    /// The group id field is empty.
    #[error("group id is empty")]
    EmptyGroupId,

    /// The group id contains a forbidden character.
    #[error("group id contains forbidden character {0:?}")]
    InvalidGroupId(char),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
