//! AES-256-GCM encryption of action payloads under a shared group key.
//!
//! A ciphertext blob is self-contained: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use std::io::Write;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};
use crate::keyfile::{refuse_symlink, write_private};

/// Group key length in bytes (AES-256).
pub const GROUP_KEY_LEN: usize = 32;

/// Nonce length prefixed to every ciphertext blob.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// Smallest well-formed blob: a nonce and a tag around an empty payload.
pub const MIN_CIPHERTEXT_LEN: usize = 28;

/// A symmetric key shared by every member of a group.
///
/// Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct GroupKey([u8; GROUP_KEY_LEN]);

impl GroupKey {
    /// Generate a new random group key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; GROUP_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        <[u8; GROUP_KEY_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: GROUP_KEY_LEN,
                actual: bytes.len(),
            })
    }

    /// Decode from hex (surrounding whitespace is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidHexEncoding`] or [`CryptoError::InvalidKeyLength`].
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes =
            Zeroizing::new(hex::decode(s.trim()).map_err(|_| CryptoError::InvalidHexEncoding)?);
        Self::from_bytes(&bytes)
    }

    /// Encode as hex (careful - sensitive!).
    #[must_use]
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }

    /// Get the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; GROUP_KEY_LEN] {
        &self.0
    }

    /// Load a hex key file. Refuses symlinks.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IoError`] if the file cannot be read, otherwise the
    /// errors of [`from_hex`](Self::from_hex).
    pub fn load(path: impl AsRef<Path>) -> CryptoResult<Self> {
        let path = path.as_ref();
        refuse_symlink(path)?;
        let text = Zeroizing::new(
            std::fs::read_to_string(path).map_err(|e| CryptoError::IoError(e.to_string()))?,
        );
        Self::from_hex(&text)
    }

    /// Write the key as hex to a new owner-only file. Fails if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IoError`] on any I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        let encoded = self.to_hex();
        write_private(path.as_ref(), false, |file| file.write_all(encoded.as_bytes()))
    }

    /// Write the key to `path`, atomically replacing any existing key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::IoError`] on any I/O failure.
    pub fn replace(&self, path: impl AsRef<Path>) -> CryptoResult<()> {
        let encoded = self.to_hex();
        write_private(path.as_ref(), true, |file| file.write_all(encoded.as_bytes()))
    }

    fn cipher(&self) -> CryptoResult<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.0).map_err(|_| CryptoError::InvalidKeyLength {
            expected: GROUP_KEY_LEN,
            actual: self.0.len(),
        })
    }
}

impl std::fmt::Debug for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GroupKey(***)")
    }
}

/// Encrypt `payload` under `key` with a fresh random nonce.
///
/// Returns `nonce || ciphertext || tag`.
///
/// # Errors
///
/// Returns [`CryptoError::NonceGeneration`] if the OS random source fails, or
/// [`CryptoError::EncryptionFailed`] if the cipher rejects the input.
pub fn encrypt(payload: &[u8], key: &GroupKey) -> CryptoResult<Vec<u8>> {
    let cipher = key.cipher()?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::NonceGeneration(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), payload)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut blob = Vec::with_capacity(NONCE_LEN.saturating_add(ciphertext.len()));
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CryptoError::CiphertextTooShort`] for blobs that cannot hold a nonce
/// and tag, and [`CryptoError::DecryptionFailed`] when authentication fails
/// (wrong key, corrupted or truncated ciphertext).
pub fn decrypt(blob: &[u8], key: &GroupKey) -> CryptoResult<Vec<u8>> {
    if blob.len() < MIN_CIPHERTEXT_LEN {
        return Err(CryptoError::CiphertextTooShort {
            minimum: MIN_CIPHERTEXT_LEN,
            actual: blob.len(),
        });
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

    key.cipher()?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let key = GroupKey::generate();
        let blob = encrypt(b"This is some random data to be signed", &key).unwrap();
        assert_eq!(blob.len(), NONCE_LEN + 37 + TAG_LEN);
        assert_eq!(
            decrypt(&blob, &key).unwrap(),
            b"This is some random data to be signed"
        );
    }

    #[test]
    fn test_empty_payload() {
        let key = GroupKey::generate();
        let blob = encrypt(b"", &key).unwrap();
        assert_eq!(blob.len(), MIN_CIPHERTEXT_LEN);
        assert!(decrypt(&blob, &key).unwrap().is_empty());
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let key = GroupKey::generate();
        let a = encrypt(b"same", &key).unwrap();
        let b = encrypt(b"same", &key).unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = encrypt(b"secret", &GroupKey::generate()).unwrap();
        let result = decrypt(&blob, &GroupKey::generate());
        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_corrupted_ciphertext_fails() {
        let key = GroupKey::generate();
        let mut blob = encrypt(b"secret", &key).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(
            decrypt(&blob, &key),
            Err(CryptoError::DecryptionFailed)
        ));

        let mut blob = encrypt(b"secret", &key).unwrap();
        blob[0] ^= 0x01;
        assert!(matches!(
            decrypt(&blob, &key),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_short_blobs_fail_cleanly() {
        let key = GroupKey::generate();
        for len in [0usize, 5, NONCE_LEN, MIN_CIPHERTEXT_LEN - 1] {
            let result = decrypt(&vec![0u8; len], &key);
            assert!(
                matches!(result, Err(CryptoError::CiphertextTooShort { .. })),
                "length {len} should be rejected, got {result:?}"
            );
        }

        let blob = encrypt(b"truncate me", &key).unwrap();
        assert!(decrypt(&blob[..blob.len() - 1], &key).is_err());
    }

    #[test]
    fn test_group_key_lengths() {
        assert!(GroupKey::from_bytes(&[1u8; 32]).is_ok());
        for len in [0usize, 16, 24, 31, 33] {
            assert!(matches!(
                GroupKey::from_bytes(&vec![1u8; len]),
                Err(CryptoError::InvalidKeyLength { .. })
            ));
        }
    }

    #[test]
    fn test_group_key_hex_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.key");

        let key = GroupKey::generate();
        key.save(&path).unwrap();
        let loaded = GroupKey::load(&path).unwrap();
        assert_eq!(key.as_bytes(), loaded.as_bytes());

        let from_hex = GroupKey::from_hex(&format!("  {}\n", key.to_hex().as_str())).unwrap();
        assert_eq!(key.as_bytes(), from_hex.as_bytes());
        assert!(GroupKey::from_hex("xyz").is_err());
    }

    #[test]
    fn test_group_key_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.key");

        GroupKey::generate().save(&path).unwrap();
        let rotated = GroupKey::generate();
        assert!(rotated.save(&path).is_err());
        rotated.replace(&path).unwrap();

        assert_eq!(GroupKey::load(&path).unwrap().as_bytes(), rotated.as_bytes());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = GroupKey::from_bytes(&[0xab; 32]).unwrap();
        assert!(!format!("{key:?}").contains("abab"));
    }
}
