//! Rampart Compliance - Rule registry, best-practices analyzer and autofix.
//!
//! This crate evaluates a proposed resource configuration against a
//! registrable rule set:
//!
//! - [`RuleRegistry`]: ordered rules keyed by id, pre-loaded with the
//!   built-in set
//! - [`BestPracticesAnalyzer`]: produces an [`AnalysisReport`] of
//!   [`Violation`]s for a component configuration
//! - [`compliance_score`]: 0-100 summary of a report's severity burden
//! - [`autofix`]: applies rule remediations and re-analyzes the result
//! - [`format_report_as_markdown`]: human-readable rendering
//!
//! # Example
//!
//! ```
//! use rampart_compliance::{AnalyzeOptions, AutofixOptions, BestPracticesAnalyzer};
//! use rampart_core::ComponentConfig;
//!
//! let analyzer = BestPracticesAnalyzer::new();
//! let config = ComponentConfig::new()
//!     .with("storage_encrypted", false)
//!     .with("publicly_accessible", true);
//!
//! let report = analyzer.analyze("rds", &config, &AnalyzeOptions::default());
//! assert!(report.has_violation("sec-001"));
//!
//! let fixed = analyzer.autofix("rds", &config, &AutofixOptions::default());
//! assert_eq!(fixed.fixed_config.get_bool("storage_encrypted"), Some(true));
//! assert!(!fixed.violations_remaining.has_violation("sec-002"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod analyzer;
pub mod autofix;
pub mod builtin;
/// Error types for the rule registry.
pub mod error;
pub mod registry;
pub mod report;
pub mod rule;
pub mod score;

pub use analyzer::{
    AnalysisReport, AnalysisSummary, AnalyzeOptions, BestPracticesAnalyzer, ComponentInput,
    ComponentReport, Violation, analyze, analyze_all,
};
pub use autofix::{AutofixOptions, AutofixResult, autofix};
pub use error::{ComplianceError, ComplianceResult};
pub use registry::RuleRegistry;
pub use report::format_report_as_markdown;
pub use rule::{CheckFn, FixFn, Rule, RuleSummary};
pub use score::{ComplianceGrade, compliance_score, severity_weight};
