//! Rampart Core - Shared vocabulary for the Rampart policy engine.
//!
//! This crate provides:
//! - [`Severity`] and [`Category`] classifications shared by compliance rules
//!   and safety risks
//! - [`ConfigValue`] and [`ComponentConfig`], the open-ended key/value model
//!   used for resource configurations
//! - Parse errors for the string forms of the above

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod config;
pub mod error;
pub mod types;

pub use config::{ComponentConfig, ConfigValue};
pub use error::{CoreError, CoreResult};
pub use types::{Category, Severity};
