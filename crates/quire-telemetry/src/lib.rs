//! Quire Telemetry - Logging setup for quire.
//!
//! Wraps `tracing-subscriber` with a small configuration type: level,
//! per-crate directives, output format and target (stdout, stderr or
//! rolling files). With the `config` feature a [`LogConfig`] can be built
//! from the `[logging]` section of the quire configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use quire_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), quire_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("quire_audit=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
