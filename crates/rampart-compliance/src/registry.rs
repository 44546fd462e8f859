//! Ordered, mutable rule registry.
//!
//! Registration order is significant: the analyzer reports violations and the
//! autofix engine applies remediations in the order rules were added.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rampart_core::Category;

use crate::builtin;
use crate::error::{ComplianceError, ComplianceResult};
use crate::rule::Rule;

/// Ordered set of compliance rules keyed by unique identifier.
///
/// Thread-safe via an internal [`RwLock`]. Each registry is an independent
/// instance; two engines built from different registries never observe each
/// other's rules.
///
/// # Example
///
/// ```
/// use rampart_compliance::RuleRegistry;
/// use rampart_core::Category;
///
/// let registry = RuleRegistry::new();
/// assert!(registry.get("sec-001").is_some());
/// assert!(!registry.rules_by_category(Category::Cost).is_empty());
///
/// assert!(RuleRegistry::empty().is_empty());
/// ```
pub struct RuleRegistry {
    rules: RwLock<Vec<Rule>>,
}

impl RuleRegistry {
    /// Create a registry pre-loaded with the built-in rule set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(builtin::builtin_rules()),
        }
    }

    /// Create a registry with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Rule>> {
        self.rules.read().unwrap_or_else(|e| {
            tracing::warn!("RuleRegistry read lock poisoned, recovering");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Rule>> {
        self.rules.write().unwrap_or_else(|e| {
            tracing::warn!("RuleRegistry lock poisoned, recovering");
            e.into_inner()
        })
    }

    /// Append a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::DuplicateRule`] if a rule with the same id
    /// is already registered.
    pub fn add_rule(&self, rule: Rule) -> ComplianceResult<()> {
        let mut rules = self.write();
        if rules.iter().any(|r| r.id == rule.id) {
            return Err(ComplianceError::DuplicateRule { id: rule.id });
        }
        tracing::debug!(rule_id = %rule.id, "registered compliance rule");
        rules.push(rule);
        Ok(())
    }

    /// Remove a rule by id.
    ///
    /// Returns `true` if a rule was removed. Removing an unknown id is a
    /// no-op.
    pub fn remove_rule(&self, id: &str) -> bool {
        let mut rules = self.write();
        let before = rules.len();
        rules.retain(|r| r.id != id);
        let removed = rules.len() != before;
        if removed {
            tracing::debug!(rule_id = id, "removed compliance rule");
        }
        removed
    }

    /// Rules applicable to `component_type`, in registration order.
    #[must_use]
    pub fn rules_for_component(&self, component_type: &str) -> Vec<Rule> {
        self.read()
            .iter()
            .filter(|r| r.applies_to_component(component_type))
            .cloned()
            .collect()
    }

    /// Rules in `category`, in registration order.
    #[must_use]
    pub fn rules_by_category(&self, category: Category) -> Vec<Rule> {
        self.read()
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    /// All rules, in registration order.
    #[must_use]
    pub fn rules(&self) -> Vec<Rule> {
        self.read().clone()
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Rule> {
        self.read().iter().find(|r| r.id == id).cloned()
    }

    /// Rule ids in registration order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<String> {
        self.read().iter().map(|r| r.id.clone()).collect()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rule_ids", &self.rule_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{ComponentConfig, Severity};

    fn rule(id: &str, category: Category, applies_to: &[&str]) -> Rule {
        Rule::new(id, category, Severity::Medium, id)
            .applies_to(applies_to.iter().copied())
            .with_check(|_: &ComponentConfig| false)
    }

    #[test]
    fn test_add_preserves_order() {
        let registry = RuleRegistry::empty();
        registry
            .add_rule(rule("b", Category::Cost, &["s3"]))
            .unwrap();
        registry
            .add_rule(rule("a", Category::Cost, &["s3"]))
            .unwrap();
        registry
            .add_rule(rule("c", Category::Security, &["rds"]))
            .unwrap();

        assert_eq!(registry.rule_ids(), vec!["b", "a", "c"]);
        let ids: Vec<_> = registry
            .rules_for_component("s3")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let registry = RuleRegistry::empty();
        registry
            .add_rule(rule("dup", Category::Cost, &["s3"]))
            .unwrap();
        let err = registry
            .add_rule(rule("dup", Category::Security, &["rds"]))
            .unwrap_err();
        assert_eq!(
            err,
            ComplianceError::DuplicateRule {
                id: "dup".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dup").unwrap().category, Category::Cost);
    }

    #[test]
    fn test_remove_rule() {
        let registry = RuleRegistry::empty();
        registry
            .add_rule(rule("x", Category::Cost, &["s3"]))
            .unwrap();
        assert!(registry.remove_rule("x"));
        assert!(registry.is_empty());
        // Absent id is a no-op.
        assert!(!registry.remove_rule("x"));
    }

    #[test]
    fn test_readd_after_remove() {
        let registry = RuleRegistry::empty();
        registry
            .add_rule(rule("x", Category::Cost, &["s3"]))
            .unwrap();
        registry.remove_rule("x");
        assert!(registry
            .add_rule(rule("x", Category::Cost, &["s3"]))
            .is_ok());
    }

    #[test]
    fn test_rules_by_category() {
        let registry = RuleRegistry::empty();
        registry
            .add_rule(rule("s1", Category::Security, &["rds"]))
            .unwrap();
        registry
            .add_rule(rule("c1", Category::Cost, &["rds"]))
            .unwrap();
        registry
            .add_rule(rule("s2", Category::Security, &["s3"]))
            .unwrap();

        let ids: Vec<_> = registry
            .rules_by_category(Category::Security)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert!(registry.rules_by_category(Category::Performance).is_empty());
    }

    #[test]
    fn test_independent_instances() {
        let a = RuleRegistry::new();
        let b = RuleRegistry::new();
        a.remove_rule("sec-001");
        assert!(a.get("sec-001").is_none());
        assert!(b.get("sec-001").is_some());
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let registry = RuleRegistry::new();
        let mut ids = registry.rule_ids();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
