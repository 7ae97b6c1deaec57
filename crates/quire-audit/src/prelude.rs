//! Prelude module - commonly used types for convenient import.
//!
//! Use `use quire_audit::prelude::*;` to import all essential types.

// Errors
pub use crate::{AuditError, AuditResult, FormatError};

// Records
pub use crate::{GroupId, PeerAction};

// Chain and verification
pub use crate::{ChainVerificationResult, PeerActionSequence, Violation, ViolationKind};

// Persistence and sharing
pub use crate::{FileSequenceStore, MemorySequenceStore, SequenceStore, SharedSequence};
