//! Recoverable secp256k1 signatures.
//!
//! Signatures travel as 65 bytes, `R || S || V`. Only `R || S` is checked by
//! verification; `V` (the recovery id) is ancillary and unauthenticated, so a
//! record whose last byte was flipped still verifies.

use secp256k1::{Message, Secp256k1, ecdsa};
use std::fmt;

use crate::error::{CryptoError, CryptoResult};
use crate::hash::ContentHash;
use crate::keypair::PublicKey;

/// Length of the authenticated `R || S` part.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

/// Length of a full recoverable signature, `R || S || V`.
pub const SIGNATURE_LEN: usize = 65;

/// A recoverable secp256k1 signature (65 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub(crate) fn from_parts(compact: [u8; COMPACT_SIGNATURE_LEN], recovery_id: u8) -> Self {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..COMPACT_SIGNATURE_LEN].copy_from_slice(&compact);
        bytes[COMPACT_SIGNATURE_LEN] = recovery_id;
        Self(bytes)
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Verify a raw signature prefix over `hash`.
    ///
    /// Exactly the first 64 bytes of `signature` are checked. Anything after
    /// them is ignored; anything shorter is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignatureLength`] if fewer than 64 bytes are
    /// given, [`CryptoError::SignatureVerificationFailed`] if `R || S` is malformed
    /// or does not verify.
    pub fn verify_compact(
        signature: &[u8],
        hash: &ContentHash,
        public_key: &PublicKey,
    ) -> CryptoResult<()> {
        let compact =
            signature
                .get(..COMPACT_SIGNATURE_LEN)
                .ok_or(CryptoError::InvalidSignatureLength {
                    expected: COMPACT_SIGNATURE_LEN,
                    actual: signature.len(),
                })?;
        let sig = ecdsa::Signature::from_compact(compact)
            .map_err(|_| CryptoError::SignatureVerificationFailed)?;
        let message = Message::from_digest(*hash.as_bytes());
        let key = public_key.to_secp()?;

        Secp256k1::verification_only()
            .verify_ecdsa(&message, &sig, &key)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &hex::encode(self.0)[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    fn signed() -> (KeyPair, ContentHash, Signature) {
        let keypair = KeyPair::generate();
        let hash = ContentHash::hash(b"test message");
        let sig = keypair.sign_hash(&hash).unwrap();
        (keypair, hash, sig)
    }

    fn verify(signature: &[u8], hash: &ContentHash, keypair: &KeyPair) -> bool {
        Signature::verify_compact(signature, hash, keypair.public_key()).is_ok()
    }

    #[test]
    fn test_signature_layout() {
        let (_, _, sig) = signed();
        assert_eq!(sig.as_bytes().len(), SIGNATURE_LEN);
        assert!(sig.as_bytes()[COMPACT_SIGNATURE_LEN] <= 1);
    }

    #[test]
    fn test_signature_verification() {
        let (keypair, hash, sig) = signed();

        assert!(verify(sig.as_bytes(), &hash, &keypair));

        // Wrong digest
        assert!(!verify(sig.as_bytes(), &ContentHash::hash(b"other"), &keypair));

        // Wrong public key
        assert!(!verify(sig.as_bytes(), &hash, &KeyPair::generate()));
    }

    #[test]
    fn test_recovery_byte_is_not_authenticated() {
        let (keypair, hash, sig) = signed();
        let mut bytes = *sig.as_bytes();
        bytes[64] ^= 0xff;
        assert!(verify(&bytes, &hash, &keypair));
    }

    #[test]
    fn test_every_compact_byte_is_authenticated() {
        let (keypair, hash, sig) = signed();
        for i in [0usize, 31, 32, 63] {
            let mut bytes = *sig.as_bytes();
            bytes[i] ^= 0x01;
            assert!(
                !verify(&bytes, &hash, &keypair),
                "flipping byte {i} must break the signature"
            );
        }
    }

    #[test]
    fn test_verify_compact_lengths() {
        let (keypair, hash, sig) = signed();
        let compact = &sig.as_bytes()[..COMPACT_SIGNATURE_LEN];

        // Exactly 64 bytes (no recovery id) still verifies.
        assert!(verify(compact, &hash, &keypair));

        // 63 bytes is rejected rather than padded.
        let result = Signature::verify_compact(&compact[..63], &hash, keypair.public_key());
        assert!(matches!(
            result,
            Err(CryptoError::InvalidSignatureLength { actual: 63, .. })
        ));

        assert!(!verify(&[], &hash, &keypair));
    }
}
