//! Safety evaluator: classifies an operation and decides on approval.
//!
//! # Evaluation Stages
//!
//! Every stage runs; risks are collected in this order:
//!
//! 1. Destructive keyword (`destroy`, `delete`) -> `destructive-operation` (critical)
//! 2. Listed in `always_require_approval` but not destructive ->
//!    `approval-required-operation` (medium, policy)
//! 3. Protected environment -> `protected-environment` (high, policy)
//! 4. Estimated cost above threshold -> `high-cost` (high, policy)
//! 5. Plan output destroying N > 0 resources -> `resource-destruction`
//!    (critical when N >= 10, else high)
//! 6. Plan output without a recognizable summary -> `plan-unparsed` (low)

use std::path::Path;

use rampart_core::Severity;

use crate::assessment::{ContextField, Risk, SafetyAssessment, risk_id};
use crate::context::SafetyContext;
use crate::error::SafetyResult;
use crate::loader::{self, PolicySource};
use crate::plan::{self, PlanSummary};
use crate::policy::{self, SafetyPolicy};

/// Operation keywords that mark an operation as destructive.
pub const DESTRUCTIVE_KEYWORDS: [&str; 2] = ["destroy", "delete"];

/// Plan destroy count at which resource destruction becomes critical.
pub const MASS_DESTRUCTION_THRESHOLD: u32 = 10;

/// Evaluates operations against a [`SafetyPolicy`].
///
/// # Example
///
/// ```
/// use rampart_safety::{SafetyContext, SafetyEvaluator};
///
/// let evaluator = SafetyEvaluator::default();
/// assert!(!evaluator.requires_safety_check("terraform plan"));
///
/// let context = SafetyContext::new("terraform destroy", "terraform")
///     .with_environment("production");
/// let assessment = evaluator.evaluate_safety(&context).unwrap();
/// assert!(!assessment.passed);
/// assert!(assessment.requires_approval);
/// ```
#[derive(Debug, Clone)]
pub struct SafetyEvaluator {
    policy: SafetyPolicy,
    source: PolicySource,
}

impl SafetyEvaluator {
    /// Create an evaluator with an explicit policy.
    #[must_use]
    pub fn new(policy: SafetyPolicy) -> Self {
        Self {
            policy,
            source: PolicySource::Default,
        }
    }

    /// Create an evaluator from the policy file at `path`, or from the
    /// conventional locations when `None`. Falls back to defaults.
    #[must_use]
    pub fn from_policy_file(path: Option<&Path>) -> Self {
        let (policy, source) = loader::load_safety_policy_with_source(path);
        Self { policy, source }
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    /// Where the active policy came from.
    #[must_use]
    pub fn source(&self) -> &PolicySource {
        &self.source
    }

    /// `false` iff `operation` matches a `skip_safety_for` entry.
    #[must_use]
    pub fn requires_safety_check(&self, operation: &str) -> bool {
        !self.policy.skips_safety_for(operation)
    }

    /// Whether `operation` in `context` needs human approval.
    ///
    /// True iff the operation is listed in `always_require_approval`, the
    /// environment is protected, or the estimated cost exceeds the threshold.
    #[must_use]
    pub fn requires_approval(&self, operation: &str, context: &SafetyContext) -> bool {
        self.policy.requires_approval_for(operation)
            || self.protected_environment(context).is_some()
            || self.excessive_cost(context).is_some()
    }

    /// Assess `context`.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::InvalidContext`](crate::SafetyError::InvalidContext)
    /// if the context fails [`SafetyContext::validate`].
    pub fn evaluate_safety(&self, context: &SafetyContext) -> SafetyResult<SafetyAssessment> {
        context.validate()?;

        let mut risks = Vec::new();
        let destructive = is_destructive(&context.operation);

        if destructive {
            risks.push(
                Risk::new(
                    risk_id::DESTRUCTIVE_OPERATION,
                    Severity::Critical,
                    format!(
                        "'{}' destroys or deletes infrastructure",
                        context.operation
                    ),
                )
                .with_fields([ContextField::Operation])
                .with_mitigation("Review the plan and confirm every affected resource")
                .with_mitigation("Take snapshots or backups of stateful resources first"),
            );
        } else if self.policy.requires_approval_for(&context.operation) {
            risks.push(
                Risk::new(
                    risk_id::APPROVAL_REQUIRED_OPERATION,
                    Severity::Medium,
                    format!(
                        "policy requires approval for '{}'",
                        context.operation
                    ),
                )
                .with_fields([ContextField::Operation])
                .mandated_by_policy()
                .with_mitigation("Obtain approval from a reviewer before executing"),
            );
        }

        if let Some(environment) = self.protected_environment(context) {
            risks.push(
                Risk::new(
                    risk_id::PROTECTED_ENVIRONMENT,
                    Severity::High,
                    format!("environment '{environment}' is protected"),
                )
                .with_fields([ContextField::Environment])
                .mandated_by_policy()
                .with_mitigation("Apply the change to a non-protected environment first"),
            );
        }

        if let Some(cost) = self.excessive_cost(context) {
            risks.push(
                Risk::new(
                    risk_id::HIGH_COST,
                    Severity::High,
                    format!(
                        "estimated cost {cost:.2} exceeds the threshold of {:.2}",
                        self.policy.cost_threshold
                    ),
                )
                .with_fields([ContextField::EstimatedCost])
                .mandated_by_policy()
                .with_mitigation("Right-size the resources or confirm the budget"),
            );
        }

        if let Some(text) = context.plan_text() {
            match plan::parse_plan_summary(text) {
                Some(summary) if summary.destroys_resources() => {
                    risks.push(resource_destruction_risk(&summary));
                },
                Some(_) => {},
                None => risks.push(
                    Risk::new(
                        risk_id::PLAN_UNPARSED,
                        Severity::Low,
                        "could not determine destructive impact from the plan output",
                    )
                    .with_fields([ContextField::PlanOutput])
                    .with_mitigation("Inspect the plan output manually"),
                ),
            }
        }

        let requires_approval = self.requires_approval(&context.operation, context);
        let has_critical = risks.iter().any(|r| r.severity == Severity::Critical);
        let blockers = risks
            .iter()
            .filter(|r| r.is_blocker())
            .map(|r| r.id.clone())
            .collect::<Vec<_>>();

        let assessment = SafetyAssessment {
            operation: context.operation.clone(),
            passed: !has_critical && !requires_approval,
            requires_approval,
            blockers,
            affected_resources: context.affected_resources.clone(),
            risks,
        };

        tracing::debug!(
            operation = %context.operation,
            tool = %context.tool,
            risks = assessment.risks.len(),
            passed = assessment.passed,
            requires_approval = assessment.requires_approval,
            "evaluated operation safety"
        );

        Ok(assessment)
    }

    fn protected_environment<'a>(&self, context: &'a SafetyContext) -> Option<&'a str> {
        context
            .environment
            .as_deref()
            .filter(|env| self.policy.is_protected_environment(env))
    }

    fn excessive_cost(&self, context: &SafetyContext) -> Option<f64> {
        context
            .estimated_cost
            .filter(|cost| self.policy.exceeds_cost_threshold(*cost))
    }
}

impl Default for SafetyEvaluator {
    fn default() -> Self {
        Self::new(SafetyPolicy::default())
    }
}

/// Whether `operation` carries a destructive keyword.
#[must_use]
pub fn is_destructive(operation: &str) -> bool {
    DESTRUCTIVE_KEYWORDS
        .iter()
        .any(|keyword| policy::operation_matches(operation, keyword))
}

fn resource_destruction_risk(summary: &PlanSummary) -> Risk {
    let severity = if summary.to_destroy >= MASS_DESTRUCTION_THRESHOLD {
        Severity::Critical
    } else {
        Severity::High
    };
    let mut risk = Risk::new(
        risk_id::RESOURCE_DESTRUCTION,
        severity,
        format!("plan destroys {} resource(s)", summary.to_destroy),
    )
    .with_fields([ContextField::PlanOutput]);
    if !summary.destroyed_addresses.is_empty() {
        risk = risk.with_mitigation(format!(
            "Confirm the destruction of: {}",
            summary.destroyed_addresses.join(", ")
        ));
    }
    risk.with_mitigation("Use lifecycle prevent_destroy on stateful resources")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SafetyError;
    use rampart_test::{
        PLAN_OUTPUT_ADD_ONLY, PLAN_OUTPUT_NO_CHANGES, PLAN_OUTPUT_UNPARSEABLE,
        plan_output_destroying,
    };

    fn evaluator() -> SafetyEvaluator {
        SafetyEvaluator::default()
    }

    #[test]
    fn test_requires_safety_check() {
        let e = evaluator();
        assert!(!e.requires_safety_check("list"));
        assert!(!e.requires_safety_check("describe"));
        assert!(!e.requires_safety_check("terraform plan"));
        assert!(e.requires_safety_check("terraform apply"));
        assert!(e.requires_safety_check("terraform destroy"));
        assert!(e.requires_safety_check("kubectl delete"));
    }

    #[test]
    fn test_requires_approval_predicate() {
        let e = evaluator();
        let dev = SafetyContext::new("kubectl get", "kubectl").with_environment("dev");
        assert!(!e.requires_approval("kubectl get", &dev));
        assert!(e.requires_approval("terraform apply", &dev));

        let prod = SafetyContext::new("kubectl get", "kubectl").with_environment("prod");
        assert!(e.requires_approval("kubectl get", &prod));

        let costly = SafetyContext::new("scale", "kubectl").with_estimated_cost(150.0);
        assert!(e.requires_approval("scale", &costly));
    }

    #[test]
    fn test_destroy_in_production() {
        let context = SafetyContext::new("terraform destroy", "terraform")
            .with_environment("production");
        let a = evaluator().evaluate_safety(&context).unwrap();

        assert!(!a.passed);
        assert!(a.requires_approval);
        assert!(a.has_risk(risk_id::DESTRUCTIVE_OPERATION));
        assert!(a.has_risk(risk_id::PROTECTED_ENVIRONMENT));
        assert!(!a.has_risk(risk_id::APPROVAL_REQUIRED_OPERATION));
        assert_eq!(
            a.blockers,
            vec![risk_id::DESTRUCTIVE_OPERATION, risk_id::PROTECTED_ENVIRONMENT]
        );
    }

    #[test]
    fn test_list_in_dev_passes() {
        let context = SafetyContext::new("list", "aws").with_environment("dev");
        let a = evaluator().evaluate_safety(&context).unwrap();
        assert!(a.passed);
        assert!(!a.requires_approval);
        assert!(a.risks.is_empty());
        assert!(a.blockers.is_empty());
    }

    #[test]
    fn test_high_cost() {
        let context = SafetyContext::new("create", "terraform")
            .with_environment("staging")
            .with_estimated_cost(150.0);
        let a = evaluator().evaluate_safety(&context).unwrap();
        let risk = a.risk(risk_id::HIGH_COST).unwrap();
        assert_eq!(risk.severity, Severity::High);
        assert!(risk.policy_mandated);
        assert!(a.requires_approval);
        assert!(!a.passed);
    }

    #[test]
    fn test_cost_at_threshold_does_not_trigger() {
        let context = SafetyContext::new("create", "terraform").with_estimated_cost(100.0);
        let a = evaluator().evaluate_safety(&context).unwrap();
        assert!(!a.has_risk(risk_id::HIGH_COST));
        assert!(a.passed);
    }

    #[test]
    fn test_plan_destroying_few_resources() {
        let context = SafetyContext::new("terraform show", "terraform")
            .with_plan_output(plan_output_destroying(3));
        let a = evaluator().evaluate_safety(&context).unwrap();
        let risk = a.risk(risk_id::RESOURCE_DESTRUCTION).unwrap();
        assert_eq!(risk.severity, Severity::High);
        assert!(risk.description.contains('3'));
        assert!(risk.mitigations.iter().any(|m| m.contains("aws_instance.web")));
        // High but not policy-mandated: not a blocker.
        assert!(a.blockers.is_empty());
        assert!(a.passed);
    }

    #[test]
    fn test_plan_destroying_many_resources_is_critical() {
        let context = SafetyContext::new("terraform show", "terraform")
            .with_plan_output(plan_output_destroying(12));
        let a = evaluator().evaluate_safety(&context).unwrap();
        assert_eq!(
            a.risk(risk_id::RESOURCE_DESTRUCTION).unwrap().severity,
            Severity::Critical
        );
        assert!(!a.passed);
        assert_eq!(a.blockers, vec![risk_id::RESOURCE_DESTRUCTION]);
    }

    #[test]
    fn test_plan_without_destruction() {
        let e = evaluator();
        for text in [PLAN_OUTPUT_ADD_ONLY, PLAN_OUTPUT_NO_CHANGES] {
            let context = SafetyContext::new("terraform show", "terraform").with_plan_output(text);
            let a = e.evaluate_safety(&context).unwrap();
            assert!(a.risks.is_empty(), "{:?}", a.risks);
        }
    }

    #[test]
    fn test_unparseable_plan_is_flagged() {
        let context = SafetyContext::new("terraform show", "terraform")
            .with_plan_output(PLAN_OUTPUT_UNPARSEABLE);
        let a = evaluator().evaluate_safety(&context).unwrap();
        let risk = a.risk(risk_id::PLAN_UNPARSED).unwrap();
        assert_eq!(risk.severity, Severity::Low);
        assert!(a.passed);
    }

    #[test]
    fn test_approval_required_operation() {
        let context = SafetyContext::new("terraform apply", "terraform").with_environment("dev");
        let a = evaluator().evaluate_safety(&context).unwrap();
        let risk = a.risk(risk_id::APPROVAL_REQUIRED_OPERATION).unwrap();
        assert_eq!(risk.severity, Severity::Medium);
        assert!(a.requires_approval);
        assert!(!a.passed);
        assert_eq!(a.blockers, vec![risk_id::APPROVAL_REQUIRED_OPERATION]);
    }

    #[test]
    fn test_affected_resources_copied() {
        let context = SafetyContext::new("kubectl delete", "kubectl")
            .with_affected_resources(["deploy/web", "svc/web"]);
        let a = evaluator().evaluate_safety(&context).unwrap();
        assert_eq!(a.affected_resources, vec!["deploy/web", "svc/web"]);
    }

    #[test]
    fn test_requires_approval_matches_assessment() {
        let e = evaluator();
        let contexts = [
            SafetyContext::new("terraform apply", "terraform"),
            SafetyContext::new("list", "aws").with_environment("prod"),
            SafetyContext::new("describe", "aws").with_estimated_cost(1000.0),
            SafetyContext::new("get", "kubectl"),
        ];
        for context in &contexts {
            let a = e.evaluate_safety(context).unwrap();
            assert_eq!(
                a.requires_approval,
                e.requires_approval(&context.operation, context)
            );
        }
    }

    #[test]
    fn test_invalid_context_rejected() {
        let e = evaluator();
        assert!(matches!(
            e.evaluate_safety(&SafetyContext::new(" ", "terraform")),
            Err(SafetyError::InvalidContext { .. })
        ));
        assert!(matches!(
            e.evaluate_safety(
                &SafetyContext::new("apply", "terraform").with_estimated_cost(-5.0)
            ),
            Err(SafetyError::InvalidContext { .. })
        ));
    }

    #[test]
    fn test_destructive_keyword_matching() {
        assert!(is_destructive("terraform destroy -auto-approve"));
        assert!(is_destructive("kubectl delete namespace"));
        assert!(!is_destructive("terraform apply"));
        assert!(!is_destructive("undeleted"));
    }

    #[test]
    fn test_camel_case_destructive_operation() {
        let e = evaluator();
        for op in ["aws rds DeleteDBInstance", "aws cloudformation DeleteStack"] {
            assert!(is_destructive(op), "{op}");
            let a = e.evaluate_safety(&SafetyContext::new(op, "aws")).unwrap();
            assert!(a.has_risk(risk_id::DESTRUCTIVE_OPERATION));
            assert!(a.requires_approval);
            assert!(!a.passed);
        }
    }

    #[test]
    fn test_later_plan_summary_is_not_hidden() {
        let text = "Plan: 1 to add, 0 to change, 0 to destroy.\n\
                    Plan: 0 to add, 0 to change, 12 to destroy.\n";
        let context = SafetyContext::new("terragrunt run-all show", "terragrunt")
            .with_plan_output(text);
        let a = evaluator().evaluate_safety(&context).unwrap();
        let risk = a.risk(risk_id::RESOURCE_DESTRUCTION).unwrap();
        assert_eq!(risk.severity, Severity::Critical);
        assert!(risk.description.contains("12"));
        assert!(!a.passed);
    }

    #[test]
    fn test_custom_policy() {
        let policy = SafetyPolicy {
            always_require_approval: vec!["scale".to_string()],
            protected_environments: vec!["staging".to_string()],
            skip_safety_for: Vec::new(),
            cost_threshold: 5.0,
        };
        let e = SafetyEvaluator::new(policy);
        assert!(e.requires_safety_check("list"));

        let context = SafetyContext::new("kubectl scale", "kubectl")
            .with_environment("Staging")
            .with_estimated_cost(6.0);
        let a = e.evaluate_safety(&context).unwrap();
        assert!(a.has_risk(risk_id::APPROVAL_REQUIRED_OPERATION));
        assert!(a.has_risk(risk_id::PROTECTED_ENVIRONMENT));
        assert!(a.has_risk(risk_id::HIGH_COST));
        assert_eq!(a.blockers.len(), 3);
    }
}
