//! Heuristic scanning of tool plan output.
//!
//! This is text matching, not a plan parser. Recognized forms:
//! - `Plan: A to add, C to change, D to destroy.`
//! - `Plan: I to import, A to add, C to change, D to destroy.`
//! - a bare `D to destroy` count
//! - `No changes.`
//!
//! Output of several modules or workspaces carries one summary per module;
//! every summary is counted and the counts are summed.
//!
//! Resource addresses are picked up from `# <address> will be destroyed`
//! and `must be replaced` lines.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PLAN_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Plan:\s*(?:(\d+)\s+to\s+import,\s*)?(\d+)\s+to\s+add,\s*(\d+)\s+to\s+change,\s*\d+\s+to\s+destroy",
    )
    .expect("invalid regex")
});

static DESTROY_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s+to\s+destroy\b").expect("invalid regex"));

static NO_CHANGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*No changes\.").expect("invalid regex"));

static DESTROYED_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*#\s+(\S+)\s+(?:will be destroyed|must be replaced)")
        .expect("invalid regex")
});

/// Counts extracted from plan output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Resources to import, when reported.
    #[serde(default)]
    pub to_import: Option<u32>,
    /// Resources to create, when reported.
    pub to_add: Option<u32>,
    /// Resources to update in place, when reported.
    pub to_change: Option<u32>,
    /// Resources to destroy, summed over every count in the text.
    pub to_destroy: u32,
    /// Addresses of resources the plan destroys or replaces.
    pub destroyed_addresses: Vec<String>,
}

impl PlanSummary {
    /// Whether the plan destroys anything.
    #[must_use]
    pub fn destroys_resources(&self) -> bool {
        self.to_destroy > 0
    }
}

/// Extract a [`PlanSummary`], or `None` if no summary line is recognizable.
///
/// Every `N to destroy` occurrence contributes to `to_destroy`, so a later
/// module destroying resources is never hidden by an earlier one that does
/// not. Counts too large for `u32` saturate.
#[must_use]
pub fn parse_plan_summary(text: &str) -> Option<PlanSummary> {
    let destroy_counts: Vec<u32> = DESTROY_COUNT
        .captures_iter(text)
        .map(|caps| parse_count(&caps[1]))
        .collect();

    if destroy_counts.is_empty() {
        if NO_CHANGES.is_match(text) {
            return Some(PlanSummary {
                to_add: Some(0),
                to_change: Some(0),
                ..PlanSummary::default()
            });
        }
        return None;
    }

    let mut summary = PlanSummary {
        to_destroy: destroy_counts.into_iter().fold(0, u32::saturating_add),
        destroyed_addresses: destroyed_addresses(text),
        ..PlanSummary::default()
    };
    for caps in PLAN_SUMMARY.captures_iter(text) {
        if let Some(import) = caps.get(1) {
            summary.to_import = Some(add_count(summary.to_import, import.as_str()));
        }
        summary.to_add = Some(add_count(summary.to_add, &caps[2]));
        summary.to_change = Some(add_count(summary.to_change, &caps[3]));
    }
    Some(summary)
}

fn add_count(total: Option<u32>, digits: &str) -> u32 {
    total.unwrap_or(0).saturating_add(parse_count(digits))
}

fn destroyed_addresses(text: &str) -> Vec<String> {
    DESTROYED_ADDRESS
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn parse_count(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
