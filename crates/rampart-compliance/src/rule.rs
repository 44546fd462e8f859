//! Compliance rule definition.
//!
//! A [`Rule`] is a named, categorized predicate over a [`ComponentConfig`]
//! with an optional remediation. Predicates return `true` when the
//! configuration is compliant.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use rampart_core::{Category, ComponentConfig, ConfigValue, Severity};

/// Check predicate: `true` means compliant.
pub type CheckFn = Arc<dyn Fn(&ComponentConfig) -> bool + Send + Sync>;

/// Remediation: returns a corrected copy of the configuration.
pub type FixFn = Arc<dyn Fn(&ComponentConfig) -> ComponentConfig + Send + Sync>;

/// A compliance rule.
///
/// # Example
///
/// ```
/// use rampart_compliance::Rule;
/// use rampart_core::{Category, ComponentConfig, Severity};
///
/// let rule = Rule::new("custom-001", Category::Security, Severity::High, "TLS required")
///     .with_description("Listeners must terminate TLS")
///     .with_recommendation("Set `tls_enabled = true`")
///     .applies_to(["alb"])
///     .reads(["tls_enabled"])
///     .with_check(|config: &ComponentConfig| config.is_truthy("tls_enabled"))
///     .with_fix(|config: &ComponentConfig| config.with("tls_enabled", true));
///
/// let config = ComponentConfig::new();
/// assert!(!rule.check(&config));
/// assert!(rule.check(&rule.apply_fix(&config).unwrap()));
/// ```
#[derive(Clone)]
pub struct Rule {
    /// Unique identifier (e.g. `sec-001`).
    pub id: String,
    /// Area of concern.
    pub category: Category,
    /// Severity of a violation.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// What the rule checks and why it matters.
    pub description: String,
    /// How to become compliant.
    pub recommendation: String,
    /// Component types this rule is evaluated for.
    pub applies_to: Vec<String>,
    /// Config fields the predicate reads, most significant first.
    pub fields: Vec<String>,
    check: CheckFn,
    fix: Option<FixFn>,
}

impl Rule {
    /// Create a rule that applies to nothing and always passes.
    ///
    /// Use the builder methods to attach component types, fields, the
    /// predicate and an optional fix.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            title: title.into(),
            description: String::new(),
            recommendation: String::new(),
            applies_to: Vec::new(),
            fields: Vec::new(),
            check: Arc::new(|_: &ComponentConfig| true),
            fix: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the recommendation.
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Set the component types this rule applies to.
    #[must_use]
    pub fn applies_to<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = types.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the config fields the predicate reads.
    #[must_use]
    pub fn reads<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the check predicate.
    #[must_use]
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&ComponentConfig) -> bool + Send + Sync + 'static,
    {
        self.check = Arc::new(check);
        self
    }

    /// Set the fix function.
    #[must_use]
    pub fn with_fix<F>(mut self, fix: F) -> Self
    where
        F: Fn(&ComponentConfig) -> ComponentConfig + Send + Sync + 'static,
    {
        self.fix = Some(Arc::new(fix));
        self
    }

    /// Evaluate the predicate. `true` means compliant.
    #[must_use]
    pub fn check(&self, config: &ComponentConfig) -> bool {
        (self.check)(config)
    }

    /// Apply the fix, or `None` if this rule has no remediation.
    #[must_use]
    pub fn apply_fix(&self, config: &ComponentConfig) -> Option<ComponentConfig> {
        self.fix.as_ref().map(|fix| fix(config))
    }

    /// Whether this rule can participate in autofix.
    #[must_use]
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// Whether this rule is evaluated for `component_type`.
    #[must_use]
    pub fn applies_to_component(&self, component_type: &str) -> bool {
        self.applies_to.iter().any(|t| t == component_type)
    }

    /// The field and current value that a violation of this rule points at.
    ///
    /// Returns the first declared field; the value is `None` when the key is
    /// absent from `config`.
    #[must_use]
    pub fn triggering_field(
        &self,
        config: &ComponentConfig,
    ) -> Option<(String, Option<ConfigValue>)> {
        let field = self.fields.first()?;
        Some((field.clone(), config.get(field).cloned()))
    }

    /// Serializable metadata for listings.
    #[must_use]
    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id.clone(),
            category: self.category,
            severity: self.severity,
            title: self.title.clone(),
            description: self.description.clone(),
            recommendation: self.recommendation.clone(),
            applies_to: self.applies_to.clone(),
            fields: self.fields.clone(),
            fixable: self.has_fix(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .field("title", &self.title)
            .field("applies_to", &self.applies_to)
            .field("fields", &self.fields)
            .field("fixable", &self.has_fix())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}/{}] {}", self.id, self.category, self.severity, self.title)
    }
}

/// Rule metadata without the predicate and fix functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    /// Unique identifier.
    pub id: String,
    /// Area of concern.
    pub category: Category,
    /// Severity of a violation.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// What the rule checks.
    pub description: String,
    /// How to become compliant.
    pub recommendation: String,
    /// Component types the rule applies to.
    pub applies_to: Vec<String>,
    /// Fields the rule reads.
    pub fields: Vec<String>,
    /// Whether autofix can remediate violations.
    pub fixable: bool,
}
