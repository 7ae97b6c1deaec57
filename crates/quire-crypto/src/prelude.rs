//! Prelude module - commonly used types for convenient import.
//!
//! Use `use quire_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Key types
pub use crate::{GroupKey, KeyPair, PublicKey};

// Signatures
pub use crate::{Signature, SignatureVerifier};

// Hashing
pub use crate::ContentHash;

// Payload encryption
pub use crate::{decrypt, encrypt};
