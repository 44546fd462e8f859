//! Prelude module - commonly used types for convenient import.
//!
//! Use `use rampart_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Classification
pub use crate::{Category, Severity};

// Configuration model
pub use crate::{ComponentConfig, ConfigValue};
