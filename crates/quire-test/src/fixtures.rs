//! Test fixtures for keys, groups, actions and sequences.

use quire_audit::{GroupId, PeerActionSequence};
use quire_crypto::{GroupKey, KeyPair};
use rand::RngCore;
use rand::rngs::OsRng;

/// Group identifier used by fixtures unless a test needs its own.
pub const TEST_GROUP: &str = "test-group";

/// Create a fresh random peer keypair.
#[must_use]
pub fn test_keypair() -> KeyPair {
    KeyPair::generate()
}

/// Create a fresh random group key.
#[must_use]
pub fn test_group_key() -> GroupKey {
    GroupKey::generate()
}

/// The default test group identifier, [`TEST_GROUP`].
#[must_use]
pub fn test_group_id() -> GroupId {
    test_group_id_from(TEST_GROUP)
}

/// A group identifier with the given name.
///
/// # Panics
///
/// Panics if `name` is not a valid group identifier.
#[must_use]
pub fn test_group_id_from(name: &str) -> GroupId {
    GroupId::new(name).expect("invalid test group id")
}

/// Random action payload of `size` bytes.
#[must_use]
pub fn random_action(size: usize) -> Vec<u8> {
    let mut action = vec![0u8; size];
    OsRng.fill_bytes(&mut action);
    action
}

/// `count` random action payloads of `size` bytes each.
#[must_use]
pub fn random_actions(count: usize, size: usize) -> Vec<Vec<u8>> {
    (0..count).map(|_| random_action(size)).collect()
}

/// Build a sequence of `count` encrypted random actions, signed round-robin
/// by `signers`.
///
/// # Panics
///
/// Panics if `signers` is empty while `count` is non-zero, or if an append
/// fails.
#[must_use]
pub fn build_sequence(
    signers: &[KeyPair],
    count: usize,
    group_id: &GroupId,
    group_key: &GroupKey,
) -> PeerActionSequence {
    assert!(
        count == 0 || !signers.is_empty(),
        "build_sequence needs at least one signer"
    );

    let mut sequence = PeerActionSequence::new();
    for (signer, action) in signers.iter().cycle().zip(random_actions(count, 64)) {
        sequence
            .append(&action, signer, group_id, group_key)
            .expect("append failed");
    }
    sequence
}
