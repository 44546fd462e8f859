//! Markdown rendering of safety assessments.

use std::fmt::Write;

use crate::assessment::SafetyAssessment;

/// Render `assessment` as a Markdown document.
#[must_use]
pub fn format_assessment_as_markdown(assessment: &SafetyAssessment) -> String {
    let mut out = String::from("# Safety Assessment\n\n");

    let verdict = if assessment.passed { "PASSED" } else { "FAILED" };
    let _ = writeln!(out, "- **Operation:** {}", assessment.operation);
    let _ = writeln!(out, "- **Verdict:** {verdict}");
    let _ = writeln!(
        out,
        "- **Approval required:** {}",
        if assessment.requires_approval { "yes" } else { "no" }
    );
    if let Some(severity) = assessment.highest_severity() {
        let _ = writeln!(out, "- **Highest severity:** {severity}");
    }
    out.push('\n');

    out.push_str("## Risks\n\n");
    if assessment.risks.is_empty() {
        out.push_str("No risks identified.\n\n");
    }
    for risk in &assessment.risks {
        let _ = writeln!(out, "### {} ({})\n", risk.id, risk.severity);
        let _ = writeln!(out, "{}\n", risk.description);
        if risk.policy_mandated {
            out.push_str("- Mandated by safety policy\n");
        }
        if !risk.fields.is_empty() {
            let fields: Vec<String> = risk.fields.iter().map(|f| format!("`{f}`")).collect();
            let _ = writeln!(out, "- Triggered by: {}", fields.join(", "));
        }
        for mitigation in &risk.mitigations {
            let _ = writeln!(out, "- Mitigation: {mitigation}");
        }
        out.push('\n');
    }

    if !assessment.blockers.is_empty() {
        out.push_str("## Blockers\n\n");
        for risk in assessment.blocking_risks() {
            let _ = writeln!(out, "- **{}**: {}", risk.id, risk.description);
        }
        out.push('\n');
    }

    if !assessment.affected_resources.is_empty() {
        out.push_str("## Affected Resources\n\n");
        for resource in &assessment.affected_resources {
            let _ = writeln!(out, "- `{resource}`");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SafetyContext, SafetyEvaluator};

    #[test]
    fn test_failed_assessment_sections() {
        let context = SafetyContext::new("terraform destroy", "terraform")
            .with_environment("production")
            .with_affected_resource("aws_db_instance.main");
        let assessment = SafetyEvaluator::default()
            .evaluate_safety(&context)
            .unwrap();
        let md = format_assessment_as_markdown(&assessment);

        assert!(md.starts_with("# Safety Assessment"));
        assert!(md.contains("- **Verdict:** FAILED"));
        assert!(md.contains("- **Approval required:** yes"));
        assert!(md.contains("### destructive-operation (critical)"));
        assert!(md.contains("## Blockers"));
        assert!(md.contains("- **protected-environment**"));
        assert!(md.contains("`aws_db_instance.main`"));
    }

    #[test]
    fn test_passed_assessment() {
        let assessment = SafetyEvaluator::default()
            .evaluate_safety(&SafetyContext::new("list", "aws"))
            .unwrap();
        let md = format_assessment_as_markdown(&assessment);
        assert!(md.contains("- **Verdict:** PASSED"));
        assert!(md.contains("No risks identified."));
        assert!(!md.contains("## Blockers"));
    }
}
