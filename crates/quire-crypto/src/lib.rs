//! Quire Crypto - Cryptographic primitives for peer-action sequences.
//!
//! This crate provides:
//! - secp256k1 key pairs with secure memory handling
//! - 65-byte recoverable ECDSA signatures over action digests
//! - Keccak-256 content hashing for the action chain
//! - AES-256-GCM encryption of payloads under a shared group key
//!
//! # Example
//!
//! ```
//! use quire_crypto::{ContentHash, GroupKey, KeyPair, Signature, decrypt, encrypt};
//!
//! let keypair = KeyPair::generate();
//! let hash = ContentHash::hash(b"important data");
//! let signature = keypair.sign_hash(&hash).unwrap();
//! assert!(Signature::verify_compact(signature.as_bytes(), &hash, keypair.public_key()).is_ok());
//!
//! let group_key = GroupKey::generate();
//! let blob = encrypt(b"hello group", &group_key).unwrap();
//! assert_eq!(decrypt(&blob, &group_key).unwrap(), b"hello group");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod cipher;
mod error;
mod hash;
mod keyfile;
mod keypair;
mod signature;
mod verifier;

pub use cipher::{
    GROUP_KEY_LEN, GroupKey, MIN_CIPHERTEXT_LEN, NONCE_LEN, TAG_LEN, decrypt, encrypt,
};
pub use error::{CryptoError, CryptoResult};
pub use hash::{ContentHash, HASH_LEN};
pub use keypair::{KeyPair, PUBLIC_KEY_LEN, PublicKey, SECRET_KEY_LEN};
pub use signature::{COMPACT_SIGNATURE_LEN, SIGNATURE_LEN, Signature};
pub use verifier::SignatureVerifier;
