//! Peer-action records.
//!
//! A record carries an encrypted payload, the signer's compressed public key,
//! the group id and a signature over
//! `keccak256(payload || public_key || group_id || previous_signature)`.
//! Binding the previous record's signature makes each record depend on its
//! entire history.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quire_crypto::{ContentHash, GroupKey, KeyPair, PublicKey, Signature};

use crate::error::{AuditError, AuditResult, FormatError};
use crate::group::{FIELD_DELIMITER, GroupId};

/// Number of fields in an encoded record.
pub const FIELD_COUNT: usize = 4;

/// A single chain entry.
///
/// Public key and signature are kept as raw bytes: a record decoded from
/// disk may hold values that are not a valid key or signature, and those are
/// reported by [`verify_digest`](Self::verify_digest) rather than rejected
/// while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAction {
    pub(crate) encrypted_payload: Vec<u8>,
    pub(crate) public_key: Vec<u8>,
    pub(crate) group_id: GroupId,
    pub(crate) signature: Vec<u8>,
}

impl PeerAction {
    /// Create and sign a record chained to `previous`.
    ///
    /// `encrypted_payload` is stored as given.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Signing`] if the signature primitive fails.
    pub fn create(
        encrypted_payload: Vec<u8>,
        group_id: GroupId,
        previous: Option<&PeerAction>,
        signing_key: &KeyPair,
    ) -> AuditResult<Self> {
        let public_key = signing_key.public_key().as_bytes().to_vec();
        let hash = Self::compute_hash(
            &encrypted_payload,
            &public_key,
            &group_id,
            chaining_input(previous),
        );
        let signature = signing_key.sign_hash(&hash).map_err(AuditError::Signing)?;

        Ok(Self {
            encrypted_payload,
            public_key,
            group_id,
            signature: signature.as_bytes().to_vec(),
        })
    }

    /// Hash a record's fields together with its predecessor's signature.
    ///
    /// `previous_signature` is empty for the first record of a sequence.
    #[must_use]
    pub fn compute_hash(
        encrypted_payload: &[u8],
        public_key: &[u8],
        group_id: &GroupId,
        previous_signature: &[u8],
    ) -> ContentHash {
        ContentHash::hash_multi(&[
            encrypted_payload,
            public_key,
            group_id.as_bytes(),
            previous_signature,
        ])
    }

    /// The hash this record's signature should cover when it follows `previous`.
    #[must_use]
    pub fn digest(&self, previous: Option<&PeerAction>) -> ContentHash {
        Self::compute_hash(
            &self.encrypted_payload,
            &self.public_key,
            &self.group_id,
            chaining_input(previous),
        )
    }

    /// Check the signature against the recomputed hash.
    ///
    /// Returns `false` for any mismatch, including a public key that is not a
    /// valid compressed point or a signature shorter than 64 bytes.
    #[must_use]
    pub fn verify_digest(&self, previous: Option<&PeerAction>) -> bool {
        let Ok(public_key) = PublicKey::try_from_slice(&self.public_key) else {
            return false;
        };
        Signature::verify_compact(&self.signature, &self.digest(previous), &public_key).is_ok()
    }

    /// Encode as one `|`-separated line (no trailing newline).
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a line produced by [`encode`](Self::encode).
    ///
    /// Only the textual shape is checked here. Cryptographic validity is left
    /// to [`verify_digest`](Self::verify_digest).
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the line does not have four fields, if
    /// field 0 or 3 is not base64, if field 1 is not hex, or if the group id
    /// is empty.
    pub fn decode(line: &str) -> Result<Self, FormatError> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        let [payload, public_key, group_id, signature] = fields.as_slice() else {
            return Err(FormatError::FieldCount {
                expected: FIELD_COUNT,
                actual: fields.len(),
            });
        };

        let encrypted_payload = STANDARD
            .decode(payload)
            .map_err(|_| FormatError::InvalidBase64 { field: 0 })?;
        let public_key = hex::decode(public_key).map_err(|_| FormatError::InvalidHex)?;
        let group_id = GroupId::from_field(group_id)?;
        let signature = STANDARD
            .decode(signature)
            .map_err(|_| FormatError::InvalidBase64 { field: 3 })?;

        Ok(Self {
            encrypted_payload,
            public_key,
            group_id,
            signature,
        })
    }

    /// Decrypt the payload under the group key.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Crypto`] if the blob is too short or fails
    /// authentication (wrong key, corruption).
    pub fn decrypt(&self, group_key: &GroupKey) -> AuditResult<Vec<u8>> {
        Ok(quire_crypto::decrypt(&self.encrypted_payload, group_key)?)
    }

    /// The stored payload bytes.
    #[must_use]
    pub fn encrypted_payload(&self) -> &[u8] {
        &self.encrypted_payload
    }

    /// The signer's public key bytes, as stored.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The signer's public key, if the stored bytes are a valid compressed key.
    #[must_use]
    pub fn signer(&self) -> Option<PublicKey> {
        PublicKey::try_from_slice(&self.public_key).ok()
    }

    /// Short hex id of the signer (first 8 bytes of the stored key).
    #[must_use]
    pub fn signer_id_hex(&self) -> String {
        hex::encode(self.public_key.get(..8).unwrap_or(&self.public_key))
    }

    /// The group the action was recorded for.
    #[must_use]
    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    /// The stored signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

fn chaining_input(previous: Option<&PeerAction>) -> &[u8] {
    match previous {
        Some(previous) => &previous.signature,
        None => &[],
    }
}

impl fmt::Display for PeerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            STANDARD.encode(&self.encrypted_payload),
            hex::encode(&self.public_key),
            self.group_id,
            STANDARD.encode(&self.signature),
        )
    }
}

impl FromStr for PeerAction {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_crypto::{SIGNATURE_LEN, encrypt};

    fn group() -> GroupId {
        GroupId::new("group").unwrap()
    }

    #[test]
    fn test_genesis_record_verifies() {
        let keypair = KeyPair::generate();
        let action = PeerAction::create(b"payload".to_vec(), group(), None, &keypair).unwrap();

        assert_eq!(action.public_key(), keypair.public_key().as_bytes());
        assert_eq!(action.signature().len(), SIGNATURE_LEN);
        assert_eq!(action.signer(), Some(*keypair.public_key()));
        assert!(action.verify_digest(None));
    }

    #[test]
    fn test_chain_linking() {
        let keypair = KeyPair::generate();
        let first = PeerAction::create(b"one".to_vec(), group(), None, &keypair).unwrap();
        let second =
            PeerAction::create(b"two".to_vec(), group(), Some(&first), &keypair).unwrap();

        assert!(second.verify_digest(Some(&first)));
        assert!(!second.verify_digest(None));
        assert!(!first.verify_digest(Some(&second)));
    }

    #[test]
    fn test_hash_binds_every_field() {
        let base = PeerAction::compute_hash(b"p", b"k", &group(), b"s");
        assert_ne!(base, PeerAction::compute_hash(b"q", b"k", &group(), b"s"));
        assert_ne!(base, PeerAction::compute_hash(b"p", b"l", &group(), b"s"));
        assert_ne!(
            base,
            PeerAction::compute_hash(b"p", b"k", &GroupId::new("other").unwrap(), b"s")
        );
        assert_ne!(base, PeerAction::compute_hash(b"p", b"k", &group(), b""));
        assert_eq!(
            base,
            ContentHash::hash(b"pkgroups"),
            "hash is over the plain concatenation"
        );
    }

    #[test]
    fn test_tampering_fails_verification() {
        let keypair = KeyPair::generate();
        let action = PeerAction::create(b"payload".to_vec(), group(), None, &keypair).unwrap();

        let mut tampered = action.clone();
        tampered.encrypted_payload[0] ^= 0x01;
        assert!(!tampered.verify_digest(None));

        let mut tampered = action.clone();
        tampered.group_id = GroupId::new("groupx").unwrap();
        assert!(!tampered.verify_digest(None));

        let mut tampered = action.clone();
        tampered.public_key = KeyPair::generate().public_key().as_bytes().to_vec();
        assert!(!tampered.verify_digest(None));

        let mut tampered = action;
        tampered.signature[10] ^= 0x01;
        assert!(!tampered.verify_digest(None));
    }

    #[test]
    fn test_malformed_fields_are_verification_failures() {
        let keypair = KeyPair::generate();
        let action = PeerAction::create(b"payload".to_vec(), group(), None, &keypair).unwrap();

        let mut short_signature = action.clone();
        short_signature.signature.truncate(63);
        assert!(!short_signature.verify_digest(None));

        let mut no_signature = action.clone();
        no_signature.signature.clear();
        assert!(!no_signature.verify_digest(None));

        let mut bad_key = action.clone();
        bad_key.public_key = vec![0xff; 33];
        assert!(!bad_key.verify_digest(None));
        assert_eq!(bad_key.signer(), None);

        let mut short_key = action;
        short_key.public_key.truncate(5);
        assert!(!short_key.verify_digest(None));
        assert_eq!(short_key.signer_id_hex().len(), 10);
    }

    #[test]
    fn test_only_first_64_signature_bytes_authenticated() {
        let keypair = KeyPair::generate();
        let mut action =
            PeerAction::create(b"payload".to_vec(), group(), None, &keypair).unwrap();
        action.signature[64] ^= 0xff;
        assert!(action.verify_digest(None));

        action.signature.truncate(64);
        assert!(action.verify_digest(None));
    }

    #[test]
    fn test_encode_decode() {
        let keypair = KeyPair::generate();
        let group_key = GroupKey::generate();
        let blob = encrypt(b"hello", &group_key).unwrap();
        let action = PeerAction::create(blob, group(), None, &keypair).unwrap();

        let line = action.encode();
        assert_eq!(line.split('|').count(), FIELD_COUNT);
        assert!(!line.contains('\n'));
        assert_eq!(line.split('|').nth(2), Some("group"));

        let decoded: PeerAction = line.parse().unwrap();
        assert_eq!(decoded, action);
        assert!(decoded.verify_digest(None));
        assert_eq!(decoded.decrypt(&group_key).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_field_count() {
        assert_eq!(
            PeerAction::decode("YQ==|02aa|group"),
            Err(FormatError::FieldCount {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            PeerAction::decode("YQ==|02aa|group|YQ==|extra"),
            Err(FormatError::FieldCount {
                expected: 4,
                actual: 5
            })
        );
        assert!(matches!(
            PeerAction::decode(""),
            Err(FormatError::FieldCount { actual: 1, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        assert_eq!(
            PeerAction::decode("not base64!|02aa|group|YQ=="),
            Err(FormatError::InvalidBase64 { field: 0 })
        );
        assert_eq!(
            PeerAction::decode("YQ==|zz|group|YQ=="),
            Err(FormatError::InvalidHex)
        );
        assert_eq!(
            PeerAction::decode("YQ==|02aa||YQ=="),
            Err(FormatError::EmptyGroupId)
        );
        assert_eq!(
            PeerAction::decode("YQ==|02aa|group|***"),
            Err(FormatError::InvalidBase64 { field: 3 })
        );
    }

    #[test]
    fn test_decode_accepts_structurally_valid_garbage() {
        let action = PeerAction::decode("YQ==|02aa|group|YQ==").unwrap();
        assert_eq!(action.encrypted_payload(), b"a");
        assert_eq!(action.public_key(), [0x02, 0xaa]);
        assert!(!action.verify_digest(None));
    }

    #[test]
    fn test_decode_keeps_foreign_group_ids() {
        let line = "YQ==|02aa|ops\tteam|YQ==";
        let action = PeerAction::decode(line).unwrap();
        assert_eq!(action.group_id().as_str(), "ops\tteam");
        assert_eq!(action.encode(), line);
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let keypair = KeyPair::generate();
        let blob = encrypt(b"secret", &GroupKey::generate()).unwrap();
        let action = PeerAction::create(blob, group(), None, &keypair).unwrap();

        assert!(matches!(
            action.decrypt(&GroupKey::generate()),
            Err(AuditError::Crypto(_))
        ));
    }
}
