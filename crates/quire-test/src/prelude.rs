//! Prelude module - commonly used test helpers for convenient import.
//!
//! Use `use quire_test::prelude::*;` to import all essential helpers.

// Fixtures
pub use crate::fixtures::{
    build_sequence, random_action, random_actions, test_group_id, test_group_key, test_keypair,
};

// Harness
pub use crate::harness::{TestContext, setup_test_logging, test_dir};
