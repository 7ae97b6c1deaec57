//! Trusted signer registry.
//!
//! Holds the public keys whose actions a verifier is willing to accept.

use std::collections::HashSet;

use crate::keypair::PublicKey;

/// A registry of trusted public keys.
///
/// # Example
///
/// ```
/// use quire_crypto::{KeyPair, SignatureVerifier};
///
/// let keypair = KeyPair::generate();
/// let verifier = SignatureVerifier::from_keys([*keypair.public_key()]);
///
/// assert!(verifier.is_trusted_key(keypair.public_key().as_bytes()));
/// assert!(!verifier.is_trusted_key(KeyPair::generate().public_key().as_bytes()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier {
    trusted_keys: HashSet<PublicKey>,
}

impl SignatureVerifier {
    /// Create a new empty signature verifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a verifier trusting every key in `keys`.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = PublicKey>) -> Self {
        let mut verifier = Self::new();
        for key in keys {
            verifier.add_trusted_key(key);
        }
        verifier
    }

    /// Add a public key to the trusted key set.
    ///
    /// Returns `false` if the key was already trusted.
    pub fn add_trusted_key(&mut self, key: PublicKey) -> bool {
        self.trusted_keys.insert(key)
    }

    /// Check whether these exact public key bytes are trusted.
    ///
    /// Malformed keys are never trusted.
    #[must_use]
    pub fn is_trusted_key(&self, public_key: &[u8]) -> bool {
        PublicKey::try_from_slice(public_key).is_ok_and(|key| self.trusted_keys.contains(&key))
    }
}
