//! Compliance scoring.
//!
//! `score = 100 - sum(weight(severity))`, floored at 0. A report with no
//! violations always scores exactly 100.

use serde::{Deserialize, Serialize};
use std::fmt;

use rampart_core::Severity;

use crate::analyzer::AnalysisReport;

/// Maximum (perfect) score.
pub const MAX_SCORE: u32 = 100;

/// Penalty subtracted per violation of the given severity.
#[must_use]
pub fn severity_weight(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 25,
        Severity::High => 15,
        Severity::Medium => 8,
        Severity::Low => 3,
    }
}

/// Compute the 0–100 compliance score of a report.
#[must_use]
pub fn compliance_score(report: &AnalysisReport) -> u32 {
    let penalty = report
        .violations
        .iter()
        .fold(0u32, |acc, v| acc.saturating_add(severity_weight(v.severity)));
    MAX_SCORE.saturating_sub(penalty)
}

/// Letter band for a compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplianceGrade {
    /// 90 and above.
    A,
    /// 75 to 89.
    B,
    /// 50 to 74.
    C,
    /// 25 to 49.
    D,
    /// Below 25.
    F,
}

impl ComplianceGrade {
    /// Band a score.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            75..=89 => Self::B,
            50..=74 => Self::C,
            25..=49 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for ComplianceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisSummary, Violation};
    use rampart_core::Category;

    fn violation(severity: Severity) -> Violation {
        Violation {
            rule_id: "r".to_string(),
            title: "r".to_string(),
            category: Category::Security,
            severity,
            component: "rds".to_string(),
            message: String::new(),
            recommendation: String::new(),
            field: None,
            value: None,
        }
    }

    fn report(severities: &[Severity]) -> AnalysisReport {
        AnalysisReport {
            summary: AnalysisSummary {
                total_rules_checked: 40,
                violations_found: severities.len(),
                ..AnalysisSummary::default()
            },
            violations: severities.iter().copied().map(violation).collect(),
            components: None,
        }
    }

    #[test]
    fn test_zero_violations_scores_100() {
        assert_eq!(compliance_score(&report(&[])), 100);
        assert_eq!(compliance_score(&AnalysisReport::default()), 100);
    }

    #[test]
    fn test_weights_are_ordered() {
        assert!(severity_weight(Severity::Critical) > severity_weight(Severity::High));
        assert!(severity_weight(Severity::High) > severity_weight(Severity::Medium));
        assert!(severity_weight(Severity::Medium) > severity_weight(Severity::Low));
    }

    #[test]
    fn test_single_violation_scores() {
        assert_eq!(compliance_score(&report(&[Severity::Critical])), 75);
        assert_eq!(compliance_score(&report(&[Severity::Low])), 97);
        assert_eq!(
            compliance_score(&report(&[Severity::High, Severity::Medium])),
            77
        );
    }

    #[test]
    fn test_score_floors_at_zero() {
        let many = vec![Severity::Critical; 10];
        assert_eq!(compliance_score(&report(&many)), 0);
    }

    #[test]
    fn test_score_monotonically_non_increasing() {
        let mut severities = Vec::new();
        let mut previous = compliance_score(&report(&severities));
        for severity in [
            Severity::Low,
            Severity::Critical,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
            Severity::Critical,
            Severity::Low,
        ] {
            severities.push(severity);
            let current = compliance_score(&report(&severities));
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_grades() {
        assert_eq!(ComplianceGrade::from_score(100), ComplianceGrade::A);
        assert_eq!(ComplianceGrade::from_score(75), ComplianceGrade::B);
        assert_eq!(ComplianceGrade::from_score(74), ComplianceGrade::C);
        assert_eq!(ComplianceGrade::from_score(25), ComplianceGrade::D);
        assert_eq!(ComplianceGrade::from_score(0), ComplianceGrade::F);
        assert_eq!(ComplianceGrade::B.to_string(), "B");
    }
}
