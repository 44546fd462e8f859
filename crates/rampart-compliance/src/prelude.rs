//! Prelude module - commonly used types for convenient import.
//!
//! Use `use rampart_compliance::prelude::*;` to import all essential types.

// Errors
pub use crate::{ComplianceError, ComplianceResult};

// Rules
pub use crate::{Rule, RuleRegistry, RuleSummary};

// Analysis
pub use crate::{
    AnalysisReport, AnalyzeOptions, BestPracticesAnalyzer, ComponentInput, Violation,
};

// Remediation and scoring
pub use crate::{AutofixOptions, AutofixResult, ComplianceGrade, compliance_score};

// Rendering
pub use crate::format_report_as_markdown;
