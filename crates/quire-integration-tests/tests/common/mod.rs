//! Shared harness for integration tests.

use std::path::PathBuf;

use quire_audit::{FileSequenceStore, GroupId, PeerActionSequence, SequenceStore};
use quire_crypto::{GroupKey, KeyPair};
use quire_test::{TestContext, test_group_id, test_group_key};

/// A group with its key, a sequence file on disk, and a set of peers.
#[allow(dead_code)]
pub struct GroupHarness {
    /// Working directory holding the sequence file.
    pub ctx: TestContext,
    /// The group identifier.
    pub group_id: GroupId,
    /// The group's shared symmetric key.
    pub group_key: GroupKey,
    /// Peer signing keys.
    pub peers: Vec<KeyPair>,
}

#[allow(dead_code)]
impl GroupHarness {
    /// A fresh group with `peer_count` peers and no sequence file yet.
    pub fn new(peer_count: usize) -> Self {
        Self {
            ctx: TestContext::new(),
            group_id: test_group_id(),
            group_key: test_group_key(),
            peers: (0..peer_count).map(|_| KeyPair::generate()).collect(),
        }
    }

    /// Path of the sequence file.
    pub fn sequence_path(&self) -> PathBuf {
        self.ctx.sequence_path()
    }

    /// Store backed by the sequence file.
    pub fn store(&self) -> FileSequenceStore {
        FileSequenceStore::new(self.sequence_path())
    }

    /// Load the sequence (empty if absent), append `payload` as `peer`, save.
    pub fn add(&self, peer: usize, payload: &[u8]) -> usize {
        let store = self.store();
        let mut sequence = store.load_or_empty().expect("load sequence");
        let index = sequence
            .append(payload, &self.peers[peer], &self.group_id, &self.group_key)
            .expect("append");
        store.save(&sequence).expect("save sequence");
        index
    }

    /// Load the sequence from disk.
    pub fn load(&self) -> PeerActionSequence {
        self.store().load().expect("load sequence")
    }

    /// Raw lines of the sequence file.
    pub fn lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.sequence_path())
            .expect("read sequence file")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Overwrite the sequence file with `lines`.
    pub fn write_lines(&self, lines: &[String]) {
        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(self.sequence_path(), text).expect("write sequence file");
    }
}
