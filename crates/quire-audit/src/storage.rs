//! Sequence persistence.
//!
//! A sequence is always stored as a whole snapshot in the line-per-record
//! text format. There is no incremental append to disk.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::info;

use crate::error::{AuditError, AuditResult};
use crate::log::PeerActionSequence;

/// Storage backend for peer-action sequences.
pub trait SequenceStore: Send + Sync {
    /// Load the stored sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored, the backend fails, or any
    /// record fails to decode.
    fn load(&self) -> AuditResult<PeerActionSequence>;

    /// Replace the stored sequence with `sequence`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, sequence: &PeerActionSequence) -> AuditResult<()>;

    /// Whether a sequence has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn exists(&self) -> AuditResult<bool>;

    /// Load the stored sequence, or start an empty one if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored sequence exists but cannot be loaded.
    fn load_or_empty(&self) -> AuditResult<PeerActionSequence> {
        if self.exists()? {
            self.load()
        } else {
            Ok(PeerActionSequence::new())
        }
    }
}

/// File-backed store: one record per line, UTF-8.
#[derive(Debug, Clone)]
pub struct FileSequenceStore {
    path: PathBuf,
}

impl FileSequenceStore {
    /// Create a store for the sequence file at `path`.
    ///
    /// The file is not touched until the first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The sequence file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, e: impl std::fmt::Display) -> AuditError {
        AuditError::StorageError(format!("{}: {e}", self.path.display()))
    }
}

impl SequenceStore for FileSequenceStore {
    fn load(&self) -> AuditResult<PeerActionSequence> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        let sequence = PeerActionSequence::deserialize(&text)?;

        info!(
            path = %self.path.display(),
            entries = sequence.len(),
            "Loaded peer-action sequence"
        );
        Ok(sequence)
    }

    fn save(&self, sequence: &PeerActionSequence) -> AuditResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.storage_error(e))?;

        // Same directory as the target so the rename stays on one filesystem.
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.storage_error(e))?;
        tmp.write_all(sequence.serialize().as_bytes())
            .map_err(|e| self.storage_error(e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.storage_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.storage_error(e.error))?;

        info!(
            path = %self.path.display(),
            entries = sequence.len(),
            "Saved peer-action sequence"
        );
        Ok(())
    }

    fn exists(&self) -> AuditResult<bool> {
        self.path.try_exists().map_err(|e| self.storage_error(e))
    }
}

/// In-memory store holding the serialized snapshot (for testing).
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    snapshot: RwLock<Option<String>>,
}

impl MemorySequenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceStore for MemorySequenceStore {
    fn load(&self) -> AuditResult<PeerActionSequence> {
        let snapshot = self.snapshot.read().map_err(|_| AuditError::LockPoisoned)?;
        match snapshot.as_deref() {
            Some(text) => PeerActionSequence::deserialize(text),
            None => Err(AuditError::StorageError("no sequence stored".to_string())),
        }
    }

    fn save(&self, sequence: &PeerActionSequence) -> AuditResult<()> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| AuditError::LockPoisoned)?;
        *snapshot = Some(sequence.serialize());
        Ok(())
    }

    fn exists(&self) -> AuditResult<bool> {
        let snapshot = self.snapshot.read().map_err(|_| AuditError::LockPoisoned)?;
        Ok(snapshot.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupId;
    use quire_crypto::{GroupKey, KeyPair};

    fn sample(len: usize) -> (PeerActionSequence, GroupKey) {
        let keypair = KeyPair::generate();
        let group_id = GroupId::new("group").unwrap();
        let group_key = GroupKey::generate();
        let mut sequence = PeerActionSequence::new();
        for i in 0..len {
            sequence
                .append(format!("action {i}").as_bytes(), &keypair, &group_id, &group_key)
                .unwrap();
        }
        (sequence, group_key)
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSequenceStore::new(dir.path().join("actions.seq"));
        let (sequence, group_key) = sample(3);

        assert!(!store.exists().unwrap());
        store.save(&sequence).unwrap();
        assert!(store.exists().unwrap());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, sequence);
        assert!(loaded.verify().valid);
        assert_eq!(
            loaded.get(2).unwrap().decrypt(&group_key).unwrap(),
            b"action 2"
        );
    }

    #[test]
    fn test_file_store_writes_text_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.seq");
        let store = FileSequenceStore::new(&path);
        let (sequence, _) = sample(2);
        store.save(&sequence).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, sequence.serialize());
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_save_replaces_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSequenceStore::new(dir.path().join("nested/dir/actions.seq"));

        store.save(&sample(3).0).unwrap();
        let (shorter, _) = sample(1);
        store.save(&shorter).unwrap();
        assert_eq!(store.load().unwrap(), shorter);
    }

    #[test]
    fn test_load_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSequenceStore::new(dir.path().join("missing.seq"));
        assert!(store.load_or_empty().unwrap().is_empty());
        assert!(matches!(store.load(), Err(AuditError::StorageError(_))));
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.seq");
        let (sequence, _) = sample(2);
        std::fs::write(&path, format!("{}garbage\n", sequence.serialize())).unwrap();

        let store = FileSequenceStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(AuditError::MalformedLine { line: 3, .. })
        ));
        assert!(store.load_or_empty().is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySequenceStore::new();
        assert!(!store.exists().unwrap());
        assert!(store.load().is_err());
        assert!(store.load_or_empty().unwrap().is_empty());

        let (sequence, _) = sample(2);
        store.save(&sequence).unwrap();
        assert!(store.exists().unwrap());
        assert_eq!(store.load().unwrap(), sequence);
    }
}
