//! Best-practices analyzer.
//!
//! Runs the registry's applicable rules against component configurations
//! and produces an [`AnalysisReport`].
//!
//! # Evaluation Order
//!
//! 1. Select rules whose `applies_to` contains the component type
//! 2. Drop rules outside the requested categories / severities
//! 3. Evaluate every remaining predicate (no short-circuit)
//! 4. Emit one [`Violation`] per failing predicate, in registration order

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rampart_core::{Category, ComponentConfig, ConfigValue, Severity};

use crate::autofix::{self, AutofixOptions, AutofixResult};
use crate::error::ComplianceResult;
use crate::registry::RuleRegistry;
use crate::report;
use crate::rule::Rule;
use crate::score::{self, ComplianceGrade};

/// Filters applied to rule selection.
///
/// `None` means unrestricted. An empty set restricts to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Only evaluate rules in these categories.
    pub categories: Option<BTreeSet<Category>>,
    /// Only evaluate rules with these severities.
    pub severities: Option<BTreeSet<Severity>>,
}

impl AnalyzeOptions {
    /// Unrestricted options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given categories.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Restrict to the given severities.
    #[must_use]
    pub fn with_severities(mut self, severities: impl IntoIterator<Item = Severity>) -> Self {
        self.severities = Some(severities.into_iter().collect());
        self
    }

    /// Whether `rule` passes the category and severity filters.
    #[must_use]
    pub fn admits(&self, rule: &Rule) -> bool {
        self.categories
            .as_ref()
            .is_none_or(|c| c.contains(&rule.category))
            && self
                .severities
                .as_ref()
                .is_none_or(|s| s.contains(&rule.severity))
    }
}

/// A failed rule predicate against one component configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the violated rule.
    pub rule_id: String,
    /// Title of the violated rule.
    pub title: String,
    /// Rule category.
    pub category: Category,
    /// Rule severity.
    pub severity: Severity,
    /// Component type the configuration belongs to.
    pub component: String,
    /// Rule description.
    pub message: String,
    /// Rule recommendation.
    pub recommendation: String,
    /// Field that triggered the violation, when the rule declares one.
    pub field: Option<String>,
    /// Current value of `field`; `None` when the key is absent.
    pub value: Option<ConfigValue>,
}

impl Violation {
    fn from_rule(rule: &Rule, component: &str, config: &ComponentConfig) -> Self {
        let (field, value) = match rule.triggering_field(config) {
            Some((field, value)) => (Some(field), value),
            None => (None, None),
        };
        Self {
            rule_id: rule.id.clone(),
            title: rule.title.clone(),
            category: rule.category,
            severity: rule.severity,
            component: component.to_owned(),
            message: rule.description.clone(),
            recommendation: rule.recommendation.clone(),
            field,
            value,
        }
    }
}

/// Counts describing an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Rules evaluated after filtering.
    pub total_rules_checked: usize,
    /// Number of violations (always equal to `violations.len()`).
    pub violations_found: usize,
    /// Violation counts per severity.
    pub by_severity: BTreeMap<Severity, usize>,
}

impl AnalysisSummary {
    fn record(&mut self, severity: Severity) {
        self.violations_found = self.violations_found.saturating_add(1);
        let count = self.by_severity.entry(severity).or_insert(0);
        *count = count.saturating_add(1);
    }

    fn absorb(&mut self, other: &Self) {
        self.total_rules_checked = self
            .total_rules_checked
            .saturating_add(other.total_rules_checked);
        self.violations_found = self.violations_found.saturating_add(other.violations_found);
        for (severity, n) in &other.by_severity {
            let count = self.by_severity.entry(*severity).or_insert(0);
            *count = count.saturating_add(*n);
        }
    }
}

/// Per-component line in a multi-component report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReport {
    /// Component type.
    pub component: String,
    /// Rules evaluated for this component.
    pub rules_checked: usize,
    /// Violations found for this component.
    pub violations_found: usize,
    /// Compliance score of this component alone.
    pub compliance_score: u32,
}

/// Result of analyzing one or more component configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Aggregate counts.
    pub summary: AnalysisSummary,
    /// Violations in rule registration order (per component, in input order).
    pub violations: Vec<Violation>,
    /// Per-component breakdown, present for multi-component analyses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentReport>>,
}

impl AnalysisReport {
    /// Whether no violations were found.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of a given rule.
    pub fn violations_for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }

    /// Whether any violation references `rule_id`.
    #[must_use]
    pub fn has_violation(&self, rule_id: &str) -> bool {
        self.violations_for_rule(rule_id).next().is_some()
    }

    /// Highest severity among the violations.
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}

/// One entry for [`analyze_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInput {
    /// Component type (e.g. `rds`).
    pub component: String,
    /// The component's configuration.
    #[serde(default)]
    pub config: ComponentConfig,
}

impl ComponentInput {
    /// Create an entry.
    #[must_use]
    pub fn new(component: impl Into<String>, config: ComponentConfig) -> Self {
        Self {
            component: component.into(),
            config,
        }
    }
}

/// Rules for `component_type` that pass `options`, in registration order.
#[must_use]
pub fn select_rules(
    registry: &RuleRegistry,
    component_type: &str,
    options: &AnalyzeOptions,
) -> Vec<Rule> {
    registry
        .rules_for_component(component_type)
        .into_iter()
        .filter(|rule| options.admits(rule))
        .collect()
}

/// Analyze one component configuration.
#[must_use]
pub fn analyze(
    registry: &RuleRegistry,
    component_type: &str,
    config: &ComponentConfig,
    options: &AnalyzeOptions,
) -> AnalysisReport {
    let rules = select_rules(registry, component_type, options);

    let mut summary = AnalysisSummary {
        total_rules_checked: rules.len(),
        ..AnalysisSummary::default()
    };
    let mut violations = Vec::new();

    for rule in &rules {
        if !rule.check(config) {
            summary.record(rule.severity);
            violations.push(Violation::from_rule(rule, component_type, config));
        }
    }

    tracing::debug!(
        component = component_type,
        rules_checked = summary.total_rules_checked,
        violations = summary.violations_found,
        "analyzed component configuration"
    );

    AnalysisReport {
        summary,
        violations,
        components: None,
    }
}

/// Analyze several components with default options.
///
/// Violations are concatenated in input order, the summary is the sum of the
/// per-component summaries and `components` carries the breakdown.
#[must_use]
pub fn analyze_all(registry: &RuleRegistry, entries: &[ComponentInput]) -> AnalysisReport {
    let options = AnalyzeOptions::default();
    let mut aggregate = AnalysisReport {
        components: Some(Vec::with_capacity(entries.len())),
        ..AnalysisReport::default()
    };

    for entry in entries {
        let report = analyze(registry, &entry.component, &entry.config, &options);
        aggregate.summary.absorb(&report.summary);
        if let Some(components) = aggregate.components.as_mut() {
            components.push(ComponentReport {
                component: entry.component.clone(),
                rules_checked: report.summary.total_rules_checked,
                violations_found: report.summary.violations_found,
                compliance_score: score::compliance_score(&report),
            });
        }
        aggregate.violations.extend(report.violations);
    }

    aggregate
}

/// Facade over a shared [`RuleRegistry`].
///
/// # Example
///
/// ```
/// use rampart_compliance::{AnalyzeOptions, BestPracticesAnalyzer};
/// use rampart_core::ComponentConfig;
///
/// let analyzer = BestPracticesAnalyzer::new();
/// let config = ComponentConfig::new()
///     .with("storage_encrypted", false)
///     .with("environment", "production");
///
/// let report = analyzer.analyze("rds", &config, &AnalyzeOptions::default());
/// assert!(report.has_violation("sec-001"));
/// assert!(analyzer.compliance_score(&report) < 100);
/// ```
#[derive(Debug, Clone)]
pub struct BestPracticesAnalyzer {
    registry: Arc<RuleRegistry>,
}

impl BestPracticesAnalyzer {
    /// Create an analyzer with its own built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(RuleRegistry::new()))
    }

    /// Create an analyzer over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// See [`analyze`].
    #[must_use]
    pub fn analyze(
        &self,
        component_type: &str,
        config: &ComponentConfig,
        options: &AnalyzeOptions,
    ) -> AnalysisReport {
        analyze(&self.registry, component_type, config, options)
    }

    /// See [`analyze_all`].
    #[must_use]
    pub fn analyze_all(&self, entries: &[ComponentInput]) -> AnalysisReport {
        analyze_all(&self.registry, entries)
    }

    /// See [`autofix::autofix`].
    #[must_use]
    pub fn autofix(
        &self,
        component_type: &str,
        config: &ComponentConfig,
        options: &AutofixOptions,
    ) -> AutofixResult {
        autofix::autofix(&self.registry, component_type, config, options)
    }

    /// See [`score::compliance_score`].
    #[must_use]
    pub fn compliance_score(&self, report: &AnalysisReport) -> u32 {
        score::compliance_score(report)
    }

    /// Letter grade for a report's score.
    #[must_use]
    pub fn compliance_grade(&self, report: &AnalysisReport) -> ComplianceGrade {
        ComplianceGrade::from_score(score::compliance_score(report))
    }

    /// Rules in `category`, in registration order.
    #[must_use]
    pub fn rules_by_category(&self, category: Category) -> Vec<Rule> {
        self.registry.rules_by_category(category)
    }

    /// Register a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::DuplicateRule`](crate::ComplianceError::DuplicateRule)
    /// if the id is taken.
    pub fn add_rule(&self, rule: Rule) -> ComplianceResult<()> {
        self.registry.add_rule(rule)
    }

    /// Remove a rule; unknown ids are ignored.
    pub fn remove_rule(&self, id: &str) -> bool {
        self.registry.remove_rule(id)
    }

    /// See [`report::format_report_as_markdown`].
    #[must_use]
    pub fn format_report_as_markdown(&self, report: &AnalysisReport) -> String {
        report::format_report_as_markdown(report)
    }
}

impl Default for BestPracticesAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
