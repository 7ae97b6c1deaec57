//! Lock-guarded sequence for use across threads.
//!
//! Appending reads the last record, signs against it and pushes, all under
//! one write lock. Readers get a consistent view under the read lock.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use quire_crypto::{GroupKey, KeyPair, SignatureVerifier};

use crate::error::{AuditError, AuditResult};
use crate::group::GroupId;
use crate::log::{ChainVerificationResult, PeerActionSequence};
use crate::storage::SequenceStore;

/// A [`PeerActionSequence`] shared between threads.
#[derive(Debug, Default)]
pub struct SharedSequence {
    inner: RwLock<PeerActionSequence>,
}

impl SharedSequence {
    /// Create an empty shared sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sequence.
    #[must_use]
    pub fn from_sequence(sequence: PeerActionSequence) -> Self {
        Self {
            inner: RwLock::new(sequence),
        }
    }

    /// Load from a store, starting empty if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored sequence cannot be loaded.
    pub fn load(store: &dyn SequenceStore) -> AuditResult<Self> {
        Ok(Self::from_sequence(store.load_or_empty()?))
    }

    /// Encrypt and append under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] or any error from
    /// [`PeerActionSequence::append`].
    pub fn append(
        &self,
        payload: &[u8],
        signing_key: &KeyPair,
        group_id: &GroupId,
        group_key: &GroupKey,
    ) -> AuditResult<usize> {
        self.write()?
            .append(payload, signing_key, group_id, group_key)
    }

    /// Append without encryption under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] or any error from
    /// [`PeerActionSequence::append_raw`].
    pub fn append_raw(
        &self,
        data: Vec<u8>,
        signing_key: &KeyPair,
        group_id: &GroupId,
    ) -> AuditResult<usize> {
        self.write()?.append_raw(data, signing_key, group_id)
    }

    /// Verify the chain as of now.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn verify(&self) -> AuditResult<ChainVerificationResult> {
        Ok(self.read()?.verify())
    }

    /// Verify the chain against a set of trusted signers.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn verify_trusted(
        &self,
        verifier: &SignatureVerifier,
    ) -> AuditResult<ChainVerificationResult> {
        Ok(self.read()?.verify_trusted(verifier))
    }

    /// Encode the current chain as text.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn serialize(&self) -> AuditResult<String> {
        Ok(self.read()?.serialize())
    }

    /// Save a snapshot of the current chain.
    ///
    /// The read lock is held for the whole write so no append can slip in
    /// between encoding and storing.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] or the store's error.
    pub fn save(&self, store: &dyn SequenceStore) -> AuditResult<()> {
        store.save(&*self.read()?)
    }

    /// Copy of the current chain.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn snapshot(&self) -> AuditResult<PeerActionSequence> {
        Ok(self.read()?.clone())
    }

    /// Number of records.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn len(&self) -> AuditResult<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the chain is empty.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> AuditResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Unwrap the inner sequence.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LockPoisoned`] if the lock is poisoned.
    pub fn into_inner(self) -> AuditResult<PeerActionSequence> {
        self.inner.into_inner().map_err(|_| AuditError::LockPoisoned)
    }

    fn read(&self) -> AuditResult<RwLockReadGuard<'_, PeerActionSequence>> {
        self.inner.read().map_err(|_| AuditError::LockPoisoned)
    }

    fn write(&self) -> AuditResult<RwLockWriteGuard<'_, PeerActionSequence>> {
        self.inner.write().map_err(|_| AuditError::LockPoisoned)
    }
}

impl From<PeerActionSequence> for SharedSequence {
    fn from(sequence: PeerActionSequence) -> Self {
        Self::from_sequence(sequence)
    }
}
