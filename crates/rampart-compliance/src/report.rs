//! Markdown rendering of analysis reports.

use std::fmt::Write;

use crate::analyzer::{AnalysisReport, Violation};
use crate::score::{ComplianceGrade, compliance_score};

/// Render `report` as a Markdown document.
///
/// Sections: `# Best Practices Report`, `## Summary`, an optional
/// `## Components` table and `## Violations`.
#[must_use]
pub fn format_report_as_markdown(report: &AnalysisReport) -> String {
    let score = compliance_score(report);
    let grade = ComplianceGrade::from_score(score);

    let mut out = String::from("# Best Practices Report\n\n");

    out.push_str("## Summary\n\n");
    let _ = writeln!(
        out,
        "- **Rules checked:** {}",
        report.summary.total_rules_checked
    );
    let _ = writeln!(
        out,
        "- **Violations found:** {}",
        report.summary.violations_found
    );
    let _ = writeln!(out, "- **Compliance score:** {score}/100 ({grade})");
    if !report.summary.by_severity.is_empty() {
        let counts: Vec<String> = report
            .summary
            .by_severity
            .iter()
            .rev()
            .map(|(severity, n)| format!("{severity}: {n}"))
            .collect();
        let _ = writeln!(out, "- **By severity:** {}", counts.join(", "));
    }
    out.push('\n');

    if let Some(components) = report.components.as_ref().filter(|c| !c.is_empty()) {
        out.push_str("## Components\n\n");
        out.push_str("| Component | Rules checked | Violations | Score |\n");
        out.push_str("|-----------|---------------|------------|-------|\n");
        for c in components {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                c.component, c.rules_checked, c.violations_found, c.compliance_score
            );
        }
        out.push('\n');
    }

    out.push_str("## Violations\n\n");
    if report.violations.is_empty() {
        out.push_str("No violations found.\n");
        return out;
    }

    for violation in &report.violations {
        write_violation(&mut out, violation);
    }
    out
}

fn write_violation(out: &mut String, v: &Violation) {
    let _ = writeln!(out, "### {}: {}\n", v.rule_id, v.title);
    let _ = writeln!(out, "- **Severity:** {}", v.severity);
    let _ = writeln!(out, "- **Category:** {}", v.category);
    let _ = writeln!(out, "- **Component:** {}", v.component);
    if let Some(field) = &v.field {
        match &v.value {
            Some(value) => {
                let _ = writeln!(out, "- **Field:** `{field}` = `{value}`");
            },
            None => {
                let _ = writeln!(out, "- **Field:** `{field}` (not set)");
            },
        }
    }
    if !v.message.is_empty() {
        let _ = writeln!(out, "\n{}", v.message);
    }
    if !v.recommendation.is_empty() {
        let _ = writeln!(out, "\n**Recommendation:** {}", v.recommendation);
    }
    out.push('\n');
}
