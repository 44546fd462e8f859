//! Prelude module - commonly used items for convenient import.
//!
//! Use `use rampart_test::prelude::*;` to import all fixtures and helpers.

pub use crate::fixtures::*;
pub use crate::harness::*;
