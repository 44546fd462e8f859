//! Description of an operation submitted for safety evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{SafetyError, SafetyResult};

/// An infrastructure operation awaiting a safety verdict.
///
/// # Example
///
/// ```
/// use rampart_safety::SafetyContext;
///
/// let context = SafetyContext::new("terraform apply", "terraform")
///     .with_environment("production")
///     .with_estimated_cost(42.0)
///     .with_affected_resource("aws_instance.web");
///
/// assert!(context.validate().is_ok());
/// assert_eq!(context.environment.as_deref(), Some("production"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyContext {
    /// Operation name (e.g. `terraform apply`).
    pub operation: String,
    /// Tool or operation type (e.g. `terraform`, `kubectl`).
    pub tool: String,
    /// Target environment.
    #[serde(default)]
    pub environment: Option<String>,
    /// Estimated cost of the operation.
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    /// Raw plan output produced by the tool, if any.
    #[serde(default)]
    pub plan_output: Option<String>,
    /// Identifiers of the resources the operation touches.
    #[serde(default)]
    pub affected_resources: Vec<String>,
}

impl SafetyContext {
    /// Create a context for `operation` run through `tool`.
    #[must_use]
    pub fn new(operation: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            tool: tool.into(),
            environment: None,
            estimated_cost: None,
            plan_output: None,
            affected_resources: Vec::new(),
        }
    }

    /// Set the target environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the estimated cost.
    #[must_use]
    pub fn with_estimated_cost(mut self, cost: f64) -> Self {
        self.estimated_cost = Some(cost);
        self
    }

    /// Attach plan output.
    #[must_use]
    pub fn with_plan_output(mut self, plan_output: impl Into<String>) -> Self {
        self.plan_output = Some(plan_output.into());
        self
    }

    /// Add one affected resource.
    #[must_use]
    pub fn with_affected_resource(mut self, resource: impl Into<String>) -> Self {
        self.affected_resources.push(resource.into());
        self
    }

    /// Add several affected resources.
    #[must_use]
    pub fn with_affected_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_resources
            .extend(resources.into_iter().map(Into::into));
        self
    }

    /// Plan output with surrounding whitespace removed, if non-blank.
    #[must_use]
    pub fn plan_text(&self) -> Option<&str> {
        self.plan_output
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Check that the context can be evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::InvalidContext`] if the operation name is blank
    /// or the estimated cost is negative or not finite.
    pub fn validate(&self) -> SafetyResult<()> {
        if self.operation.trim().is_empty() {
            return Err(SafetyError::InvalidContext {
                field: "operation",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(cost) = self.estimated_cost
            && (!cost.is_finite() || cost < 0.0)
        {
            return Err(SafetyError::InvalidContext {
                field: "estimated_cost",
                reason: format!("must be a finite non-negative number, got {cost}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let context = SafetyContext::new("kubectl delete", "kubectl")
            .with_environment("staging")
            .with_affected_resources(["pod/a", "pod/b"])
            .with_affected_resource("svc/c");
        assert_eq!(context.tool, "kubectl");
        assert_eq!(context.affected_resources, vec!["pod/a", "pod/b", "svc/c"]);
        assert!(context.estimated_cost.is_none());
    }

    #[test]
    fn test_blank_operation_rejected() {
        for op in ["", "   ", "\t\n"] {
            let err = SafetyContext::new(op, "terraform").validate().unwrap_err();
            assert!(matches!(
                err,
                SafetyError::InvalidContext {
                    field: "operation",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_bad_cost_rejected() {
        for cost in [-1.0, f64::NAN, f64::INFINITY] {
            let err = SafetyContext::new("terraform apply", "terraform")
                .with_estimated_cost(cost)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                SafetyError::InvalidContext {
                    field: "estimated_cost",
                    ..
                }
            ));
        }
        assert!(SafetyContext::new("terraform apply", "terraform")
            .with_estimated_cost(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_blank_plan_text_is_absent() {
        let context = SafetyContext::new("terraform apply", "terraform").with_plan_output("  \n");
        assert!(context.plan_text().is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let context: SafetyContext =
            serde_json::from_str(r#"{"operation": "list", "tool": "aws"}"#).unwrap();
        assert_eq!(context, SafetyContext::new("list", "aws"));
    }
}
