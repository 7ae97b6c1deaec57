//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Secret key bytes are not a valid secp256k1 scalar.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// Invalid public key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid signature length.
    #[error("invalid signature length: expected at least {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Minimum length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Signature verification failed.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// The signature primitive could not produce a signature.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The OS random source could not produce a nonce.
    #[error("nonce generation failed: {0}")]
    NonceGeneration(String),

    /// Ciphertext blob is shorter than nonce plus authentication tag.
    #[error("ciphertext too short: need at least {minimum} bytes, got {actual}")]
    CiphertextTooShort {
        /// Minimum blob length in bytes.
        minimum: usize,
        /// Actual blob length in bytes.
        actual: usize,
    },

    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Authentication failed on decrypt (wrong key or corrupted ciphertext).
    #[error("decryption failed: authentication tag mismatch")]
    DecryptionFailed,

    /// Invalid hex encoding.
    #[error("invalid hex encoding")]
    InvalidHexEncoding,

    /// I/O error (e.g. reading/writing key files).
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
