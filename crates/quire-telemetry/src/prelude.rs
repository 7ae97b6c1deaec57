//! Prelude module - commonly used types for convenient import.
//!
//! Use `use quire_telemetry::prelude::*;` to import all essential types.

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Logging
pub use crate::{LogConfig, LogFormat, LogTarget, setup_logging};
