//! Prelude module - commonly used types for convenient import.
//!
//! Use `use rampart_safety::prelude::*;` to import all essential types.

// Errors
pub use crate::{SafetyError, SafetyResult};

// Policy
pub use crate::{PolicySource, SafetyPolicy, load_safety_policy};

// Evaluation
pub use crate::{Risk, SafetyAssessment, SafetyContext, SafetyEvaluator, risk_id};

// Rendering
pub use crate::format_assessment_as_markdown;
