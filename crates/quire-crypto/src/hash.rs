//! Content hashing using Keccak-256.
//!
//! Every peer-action binds its encrypted payload, signer key, group id and
//! predecessor signature into one Keccak-256 digest, which is what gets
//! signed.

use sha3::{Digest, Keccak256};
use std::fmt;

/// Length of a digest in bytes.
pub const HASH_LEN: usize = 32;

/// A Keccak-256 content hash (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    /// Hash arbitrary data.
    #[must_use]
    pub fn hash(data: &[u8]) -> Self {
        Self::hash_multi(&[data])
    }

    /// Hash multiple data chunks (concatenated).
    ///
    /// Equivalent to hashing the concatenation of `parts`, without
    /// allocating the joined buffer.
    #[must_use]
    pub fn hash_multi(parts: &[&[u8]]) -> Self {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_basic() {
        let data = b"hello world";
        let hash = ContentHash::hash(data);

        // Same data produces same hash
        assert_eq!(hash, ContentHash::hash(data));

        // Different data produces different hash
        assert_ne!(hash, ContentHash::hash(b"different"));
    }

    #[test]
    fn test_keccak_empty_vector() {
        // Legacy Keccak-256, not NIST SHA3-256.
        assert_eq!(
            ContentHash::hash(b"").to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_multi() {
        let parts: &[&[u8]] = &[b"hello", b" ", b"world"];
        let hash_multi = ContentHash::hash_multi(parts);
        let hash_single = ContentHash::hash(b"hello world");

        assert_eq!(hash_multi, hash_single);
    }

    #[test]
    fn test_hash_multi_empty_parts() {
        let with_empty: &[&[u8]] = &[b"abc", b""];
        assert_eq!(ContentHash::hash_multi(with_empty), ContentHash::hash(b"abc"));
    }
}
