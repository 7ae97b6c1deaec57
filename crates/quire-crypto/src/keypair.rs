//! secp256k1 key pairs with secure memory handling.
//!
//! A peer is identified by the 33-byte compressed form of its public key.
//! Key files hold the 32-byte secret scalar as a single line of hex.

use std::io::Write;
use std::path::Path;

use secp256k1::{Message, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::hash::ContentHash;
use crate::keyfile::{refuse_symlink, write_private};
use crate::signature::Signature;

/// Length of a secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Length of a compressed public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

/// A secp256k1 key pair.
///
/// The secret scalar is erased on drop.
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair from the OS random source.
    #[must_use]
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut rand::rngs::OsRng);
        Self::from_secp(secret_key)
    }

    fn from_secp(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey(secret_key.public_key(&secp).serialize());
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create from a secret key (32 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes,
    /// or [`CryptoError::InvalidSecretKey`] if the scalar is zero or not below the
    /// curve order.
    pub fn from_secret_key(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            });
        }

        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_secp(secret_key))
    }

    /// Decode a secret key from hex (surrounding whitespace is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidHexEncoding`] for bad hex, otherwise the
    /// same errors as [`from_secret_key`](Self::from_secret_key).
    pub fn from_secret_hex(s: &str) -> CryptoResult<Self> {
        let bytes =
            Zeroizing::new(hex::decode(s.trim()).map_err(|_| CryptoError::InvalidHexEncoding)?);
        Self::from_secret_key(&bytes)
    }

    /// The compressed public key.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Short key ID: the first 8 bytes of the compressed public key, as hex.
    #[must_use]
    pub fn key_id_hex(&self) -> String {
        self.public_key.key_id_hex()
    }

    /// Sign a 32-byte digest, producing `R || S || V`.
    ///
    /// `V` is the recovery id (0 or 1). It is carried on the wire but is not
    /// authenticated by [`Signature::verify_compact`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SigningFailed`] if the recovery id produced by the
    /// signer does not fit in one byte.
    pub fn sign_hash(&self, hash: &ContentHash) -> CryptoResult<Signature> {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest(*hash.as_bytes());
        let recoverable = secp.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, compact) = recoverable.serialize_compact();
        let recovery_byte = u8::try_from(recovery_id.to_i32())
            .map_err(|e| CryptoError::SigningFailed(format!("recovery id: {e}")))?;
        Ok(Signature::from_parts(compact, recovery_byte))
    }

    /// Export the secret key bytes (careful - sensitive!).
    ///
    /// This should only be used for secure storage.
    #[must_use]
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(self.secret_key.secret_bytes())
    }

    /// Load a key from an existing hex key file.
    ///
    /// Refuses to follow symlinks.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IoError`] if the file cannot be read or is a symlink,
    /// otherwise the errors of [`from_secret_hex`](Self::from_secret_hex).
    pub fn load(path: impl AsRef<Path>) -> CryptoResult<Self> {
        let path = path.as_ref();
        refuse_symlink(path)?;
        let text = Zeroizing::new(
            std::fs::read_to_string(path).map_err(|e| CryptoError::IoError(e.to_string()))?,
        );
        Self::from_secret_hex(&text)
    }

    /// Write the secret key as hex to a new owner-only file.
    ///
    /// Fails if the file already exists.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IoError`] on any I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        self.write_to(path.as_ref(), false)
    }

    /// Write the secret key to `path`, atomically replacing any existing key.
    ///
    /// The previous key stays in place until the new one is fully on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IoError`] on any I/O failure.
    pub fn replace(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        self.write_to(path.as_ref(), true)
    }

    fn write_to(&self, path: &Path, overwrite: bool) -> CryptoResult<()> {
        let encoded = Zeroizing::new(hex::encode(*self.secret_key_bytes()));
        write_private(path, overwrite, |file| file.write_all(encoded.as_bytes()))
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret_key.non_secure_erase();
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_id", &self.key_id_hex())
            .finish_non_exhaustive()
    }
}

/// A compressed secp256k1 public key (33 bytes, safe to share).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Try to create from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 33 bytes,
    /// or [`CryptoError::InvalidPublicKey`] if it is not a point on the curve.
    pub fn try_from_slice(slice: &[u8]) -> CryptoResult<Self> {
        let bytes = <[u8; PUBLIC_KEY_LEN]>::try_from(slice).map_err(|_| {
            CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: slice.len(),
            }
        })?;
        secp256k1::PublicKey::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Short key ID: the first 8 bytes, as hex.
    #[must_use]
    pub fn key_id_hex(&self) -> String {
        hex::encode(&self.0[..8])
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not a compressed key.
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidHexEncoding)?;
        Self::try_from_slice(&bytes)
    }

    pub(crate) fn to_secp(self) -> CryptoResult<secp256k1::PublicKey> {
        secp256k1::PublicKey::from_slice(&self.0)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.key_id_hex())
    }
}
