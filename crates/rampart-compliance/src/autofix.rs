//! Autofix engine.
//!
//! Applies rule remediations to a running copy of a configuration. Fixes are
//! composed in registration order: each fix sees the output of the previous
//! ones, and a fix runs only if its rule still fails at the point it is
//! reached. A second run over the output therefore applies nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use rampart_core::ComponentConfig;

use crate::analyzer::{self, AnalysisReport, AnalyzeOptions};
use crate::registry::RuleRegistry;

/// Options for [`autofix`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutofixOptions {
    /// Category / severity filters, as for analysis.
    #[serde(default)]
    pub filter: AnalyzeOptions,
    /// Only apply fixes for these rule ids. `None` means every fixable rule.
    #[serde(default)]
    pub rule_ids: Option<BTreeSet<String>>,
}

impl AutofixOptions {
    /// Unrestricted options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict fixes to the given rule ids.
    #[must_use]
    pub fn with_rule_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Apply category / severity filters.
    #[must_use]
    pub fn with_filter(mut self, filter: AnalyzeOptions) -> Self {
        self.filter = filter;
        self
    }
}

/// Outcome of an autofix run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutofixResult {
    /// The corrected configuration. The input is never modified.
    pub fixed_config: ComponentConfig,
    /// Ids of the rules whose fixes were applied, in application order.
    pub applied_fixes: Vec<String>,
    /// Fresh analysis of `fixed_config` with default options.
    pub violations_remaining: AnalysisReport,
}

impl AutofixResult {
    /// Whether any fix was applied.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied_fixes.is_empty()
    }
}

/// Apply available fixes to `config`.
///
/// Rules targeted by `options.rule_ids` that have no fix are skipped
/// silently.
#[must_use]
pub fn autofix(
    registry: &RuleRegistry,
    component_type: &str,
    config: &ComponentConfig,
    options: &AutofixOptions,
) -> AutofixResult {
    let candidates = analyzer::select_rules(registry, component_type, &options.filter);

    let mut running = config.clone();
    let mut applied_fixes = Vec::new();

    for rule in candidates
        .iter()
        .filter(|r| options.rule_ids.as_ref().is_none_or(|ids| ids.contains(&r.id)))
        .filter(|r| r.has_fix())
    {
        if rule.check(&running) {
            continue;
        }
        if let Some(fixed) = rule.apply_fix(&running) {
            running = fixed;
            applied_fixes.push(rule.id.clone());
        }
    }

    if !applied_fixes.is_empty() {
        tracing::info!(
            component = component_type,
            applied = ?applied_fixes,
            "applied compliance fixes"
        );
    }

    let violations_remaining =
        analyzer::analyze(registry, component_type, &running, &AnalyzeOptions::default());

    AutofixResult {
        fixed_config: running,
        applied_fixes,
        violations_remaining,
    }
}
