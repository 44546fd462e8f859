//! Command handlers.

pub(crate) mod analyze;
pub(crate) mod evaluate;
pub(crate) mod fix;
pub(crate) mod input;
pub(crate) mod policy;
pub(crate) mod rules;
pub(crate) mod scan;
