//! Safety policy: which operations, environments and costs demand approval.
//!
//! # Matching
//!
//! Operation names and policy entries are split into alphanumeric tokens,
//! with camelCase words split at case boundaries, then lowercased. An entry
//! matches an operation when the entry's token sequence appears contiguously
//! in the operation's tokens, so `terraform apply` matches `apply`,
//! `aws rds DeleteDBInstance` matches `delete`, and `explanation` does not
//! match `plan`. Environments match case-insensitively by whole-string
//! equality.

use serde::{Deserialize, Serialize};

/// Default cost threshold above which approval is required.
pub const DEFAULT_COST_THRESHOLD: f64 = 100.0;

/// Operations that always require approval by default.
pub const DEFAULT_ALWAYS_REQUIRE_APPROVAL: [&str; 3] = ["destroy", "delete", "apply"];

/// Environments protected by default.
pub const DEFAULT_PROTECTED_ENVIRONMENTS: [&str; 2] = ["production", "prod"];

/// Operations exempt from safety checks by default.
pub const DEFAULT_SKIP_SAFETY_FOR: [&str; 3] = ["plan", "list", "describe"];

/// Safety policy governing approval requirements.
///
/// # Example
///
/// ```
/// use rampart_safety::SafetyPolicy;
///
/// let policy = SafetyPolicy::default();
/// assert!(policy.requires_approval_for("terraform apply"));
/// assert!(policy.skips_safety_for("kubectl describe pod"));
/// assert!(policy.is_protected_environment("Production"));
/// assert!(policy.exceeds_cost_threshold(100.01));
/// assert!(!policy.exceeds_cost_threshold(100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyPolicy {
    /// Operations that always require approval.
    pub always_require_approval: Vec<String>,
    /// Environments in which any operation requires approval.
    pub protected_environments: Vec<String>,
    /// Operations exempt from safety checks.
    pub skip_safety_for: Vec<String>,
    /// Estimated cost above which approval is required.
    pub cost_threshold: f64,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            always_require_approval: to_strings(&DEFAULT_ALWAYS_REQUIRE_APPROVAL),
            protected_environments: to_strings(&DEFAULT_PROTECTED_ENVIRONMENTS),
            skip_safety_for: to_strings(&DEFAULT_SKIP_SAFETY_FOR),
            cost_threshold: DEFAULT_COST_THRESHOLD,
        }
    }
}

impl SafetyPolicy {
    /// Whether `operation` matches an `always_require_approval` entry.
    #[must_use]
    pub fn requires_approval_for(&self, operation: &str) -> bool {
        matches_any(operation, &self.always_require_approval)
    }

    /// Whether `operation` matches a `skip_safety_for` entry.
    #[must_use]
    pub fn skips_safety_for(&self, operation: &str) -> bool {
        matches_any(operation, &self.skip_safety_for)
    }

    /// Whether `environment` is protected.
    #[must_use]
    pub fn is_protected_environment(&self, environment: &str) -> bool {
        let environment = environment.trim();
        self.protected_environments
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(environment))
    }

    /// Whether `cost` is strictly above the threshold.
    #[must_use]
    pub fn exceeds_cost_threshold(&self, cost: f64) -> bool {
        cost > self.cost_threshold
    }

    /// Default entries this policy no longer carries.
    ///
    /// Operators may deliberately narrow the policy, so gaps are reported,
    /// not enforced. Each entry reads `field: value`.
    #[must_use]
    pub fn invariant_gaps(&self) -> Vec<String> {
        let mut gaps = Vec::new();
        for op in DEFAULT_ALWAYS_REQUIRE_APPROVAL {
            if !self.requires_approval_for(op) {
                gaps.push(format!("always_require_approval: {op}"));
            }
        }
        for env in DEFAULT_PROTECTED_ENVIRONMENTS {
            if !self.is_protected_environment(env) {
                gaps.push(format!("protected_environments: {env}"));
            }
        }
        gaps
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Lowercase alphanumeric tokens of `s`.
///
/// camelCase and PascalCase words are split at case boundaries:
/// `DeleteDBInstance` yields `delete`, `db`, `instance`.
#[must_use]
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .flat_map(split_case_boundaries)
        .map(str::to_lowercase)
        .collect()
}

fn split_case_boundaries(word: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = word.char_indices().peekable();

    while let Some((idx, cur)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        if let Some(p) = prev
            && cur.is_uppercase()
            && (p.is_lowercase()
                || p.is_numeric()
                || (p.is_uppercase() && next.is_some_and(char::is_lowercase)))
        {
            parts.push(&word[start..idx]);
            start = idx;
        }
        prev = Some(cur);
    }
    parts.push(&word[start..]);
    parts
}

/// Whether `entry` matches `operation` under the token rule.
///
/// Entries without any alphanumeric token never match.
#[must_use]
pub fn operation_matches(operation: &str, entry: &str) -> bool {
    let needle = tokenize(entry);
    if needle.is_empty() {
        return false;
    }
    let haystack = tokenize(operation);
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

fn matches_any(operation: &str, entries: &[String]) -> bool {
    entries.iter().any(|entry| operation_matches(operation, entry))
}
