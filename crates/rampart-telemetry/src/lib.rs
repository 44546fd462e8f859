//! Rampart Telemetry - Logging setup for the Rampart policy engine.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`setup_logging`] once to install a subscriber.
//!
//! # Example
//!
//! ```rust,no_run
//! use rampart_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), rampart_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("rampart_safety=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("evaluating plan");
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
    FileLogConfig, FileRotation, LOG_ENV_VAR, LogConfig, LogFormat, LogTarget,
    setup_default_logging, setup_logging,
};
