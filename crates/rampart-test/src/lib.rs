//! Rampart Test - Shared test utilities for the Rampart policy engine.
//!
//! This crate provides configuration fixtures, sample plan output and
//! policy-file helpers used across Rampart crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! rampart-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use rampart_test::{insecure_rds_config, policy_file};
//!
//!     #[test]
//!     fn test_rds_findings() {
//!         let config = insecure_rds_config();
//!         assert_eq!(config.get_bool("storage_encrypted"), Some(false));
//!
//!         let (_dir, path) = policy_file("safety-policy.toml", "cost_threshold = 5.0");
//!         assert!(path.exists());
//!     }
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
