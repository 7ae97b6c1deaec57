//! Quire Test - Shared test utilities for quire.
//!
//! Fixtures for keys, group identifiers and random actions, plus small
//! filesystem and logging helpers. Intended as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! quire-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use quire_test::{build_sequence, test_group_id, test_group_key, test_keypair};
//!
//! #[test]
//! fn chain_verifies() {
//!     let signers = [test_keypair(), test_keypair()];
//!     let sequence = build_sequence(&signers, 10, &test_group_id(), &test_group_key());
//!     assert!(sequence.verify().valid);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
