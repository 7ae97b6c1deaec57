//! Quire Audit - Encrypted, chain-linked peer-action sequences.
//!
//! This crate provides:
//! - Peer-action records: encrypted payload, signer key, group id, signature
//! - Chain linking (each record signs over its predecessor's signature)
//! - Whole-chain verification that reports every failing index
//! - A line-per-record text format and snapshot persistence
//!
//! # Security Model
//!
//! Every record is:
//! - Encrypted under the group's AES-256-GCM key
//! - Signed by the peer's secp256k1 key
//! - Linked to the previous record through its signature
//!
//! Altering, dropping, inserting or reordering records without the signers'
//! keys is detectable by anyone holding the sequence. A signer who rewrites
//! and re-signs their own history consistently is not detected.
//!
//! # Example
//!
//! ```
//! use quire_audit::{GroupId, PeerActionSequence};
//! use quire_crypto::{GroupKey, KeyPair};
//!
//! let peer = KeyPair::generate();
//! let group_id = GroupId::new("operators").unwrap();
//! let group_key = GroupKey::generate();
//!
//! let mut sequence = PeerActionSequence::new();
//! for action in ["a", "b", "c"] {
//!     sequence
//!         .append(action.as_bytes(), &peer, &group_id, &group_key)
//!         .unwrap();
//! }
//!
//! assert!(sequence.verify().valid);
//! assert_eq!(sequence.get(1).unwrap().decrypt(&group_key).unwrap(), b"b");
//!
//! let reloaded: PeerActionSequence = sequence.serialize().parse().unwrap();
//! assert_eq!(reloaded, sequence);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entry;
mod error;
mod group;
mod log;
mod shared;
mod storage;

pub use entry::{FIELD_COUNT, PeerAction};
pub use error::{AuditError, AuditResult, FormatError};
pub use group::{FIELD_DELIMITER, GroupId};
pub use log::{ChainVerificationResult, PeerActionSequence, Violation, ViolationKind};
pub use shared::SharedSequence;
pub use storage::{FileSequenceStore, MemorySequenceStore, SequenceStore};
