//! Rampart Safety - Approval gating for infrastructure-mutating operations.
//!
//! This crate classifies an operation by risk and decides whether a human
//! must approve it before execution:
//!
//! - [`SafetyPolicy`]: operations, environments and cost thresholds that
//!   demand approval, loaded from an optional policy file
//! - [`SafetyContext`]: the operation under evaluation
//! - [`SafetyEvaluator`]: produces a [`SafetyAssessment`] of [`Risk`]s
//! - [`format_assessment_as_markdown`]: human-readable rendering
//!
//! The evaluator never executes anything; callers persist assessments and
//! gate execution on the verdict.
//!
//! # Example
//!
//! ```
//! use rampart_safety::{SafetyContext, SafetyEvaluator, risk_id};
//!
//! let evaluator = SafetyEvaluator::from_policy_file(None);
//! let context = SafetyContext::new("kubectl delete deployment web", "kubectl")
//!     .with_environment("dev");
//!
//! let assessment = evaluator.evaluate_safety(&context).unwrap();
//! assert!(assessment.has_risk(risk_id::DESTRUCTIVE_OPERATION));
//! assert!(!assessment.passed);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod assessment;
pub mod context;
/// Error types for the safety layer.
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod plan;
pub mod policy;
pub mod report;

pub use assessment::{ContextField, Risk, SafetyAssessment, risk_id};
pub use context::SafetyContext;
pub use error::{SafetyError, SafetyResult};
pub use evaluator::{SafetyEvaluator, is_destructive};
pub use loader::{
    POLICY_ENV_VAR, PolicySource, load_safety_policy, load_safety_policy_with_source,
    read_policy_file,
};
pub use plan::{PlanSummary, parse_plan_summary};
pub use policy::SafetyPolicy;
pub use report::format_assessment_as_markdown;
