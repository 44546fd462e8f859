//! Safety verdict types.

use serde::{Deserialize, Serialize};
use std::fmt;

use rampart_core::Severity;

/// Stable identifiers of the risks the evaluator can raise.
pub mod risk_id {
    /// The operation destroys or deletes infrastructure.
    pub const DESTRUCTIVE_OPERATION: &str = "destructive-operation";
    /// The policy lists the operation as always needing approval.
    pub const APPROVAL_REQUIRED_OPERATION: &str = "approval-required-operation";
    /// The target environment is protected.
    pub const PROTECTED_ENVIRONMENT: &str = "protected-environment";
    /// The estimated cost exceeds the policy threshold.
    pub const HIGH_COST: &str = "high-cost";
    /// The plan output reports resources to destroy.
    pub const RESOURCE_DESTRUCTION: &str = "resource-destruction";
    /// Plan output was supplied but its impact could not be determined.
    pub const PLAN_UNPARSED: &str = "plan-unparsed";
}

/// A context field that contributed to a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    /// `SafetyContext::operation`.
    Operation,
    /// `SafetyContext::tool`.
    Tool,
    /// `SafetyContext::environment`.
    Environment,
    /// `SafetyContext::estimated_cost`.
    EstimatedCost,
    /// `SafetyContext::plan_output`.
    PlanOutput,
    /// `SafetyContext::affected_resources`.
    AffectedResources,
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Operation => "operation",
            Self::Tool => "tool",
            Self::Environment => "environment",
            Self::EstimatedCost => "estimated_cost",
            Self::PlanOutput => "plan_output",
            Self::AffectedResources => "affected_resources",
        };
        f.write_str(name)
    }
}

/// One identified hazard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    /// Stable identifier, see [`risk_id`].
    pub id: String,
    /// How serious the hazard is.
    pub severity: Severity,
    /// Human-readable explanation.
    pub description: String,
    /// Context fields that produced this risk.
    pub fields: Vec<ContextField>,
    /// Whether the safety policy mandates approval because of this risk.
    pub policy_mandated: bool,
    /// Suggested mitigations.
    pub mitigations: Vec<String>,
}

impl Risk {
    /// Create a risk.
    #[must_use]
    pub fn new(id: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            description: description.into(),
            fields: Vec::new(),
            policy_mandated: false,
            mitigations: Vec::new(),
        }
    }

    /// Record the context fields behind this risk.
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = ContextField>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Mark this risk as mandated by policy.
    #[must_use]
    pub fn mandated_by_policy(mut self) -> Self {
        self.policy_mandated = true;
        self
    }

    /// Add a suggested mitigation.
    #[must_use]
    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigations.push(mitigation.into());
        self
    }

    /// Whether this risk blocks the operation pending approval.
    #[must_use]
    pub fn is_blocker(&self) -> bool {
        self.severity.is_blocking() || self.policy_mandated
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.id, self.description)
    }
}

/// Verdict for one [`SafetyContext`](crate::SafetyContext).
///
/// Serializable so callers can persist a snapshot under an operation id of
/// their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    /// The evaluated operation.
    pub operation: String,
    /// Risks in evaluation order.
    pub risks: Vec<Risk>,
    /// No critical risk and no approval required.
    pub passed: bool,
    /// Whether a human must approve before execution.
    pub requires_approval: bool,
    /// Ids of critical or policy-mandated risks.
    pub blockers: Vec<String>,
    /// Affected resources, copied from the context.
    pub affected_resources: Vec<String>,
}

impl SafetyAssessment {
    /// Look up a risk by id.
    #[must_use]
    pub fn risk(&self, id: &str) -> Option<&Risk> {
        self.risks.iter().find(|r| r.id == id)
    }

    /// Whether a risk with `id` was raised.
    #[must_use]
    pub fn has_risk(&self, id: &str) -> bool {
        self.risk(id).is_some()
    }

    /// Highest severity among the risks.
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.risks.iter().map(|r| r.severity).max()
    }

    /// Risks listed in `blockers`.
    pub fn blocking_risks(&self) -> impl Iterator<Item = &Risk> {
        self.risks.iter().filter(|r| self.blockers.contains(&r.id))
    }
}
