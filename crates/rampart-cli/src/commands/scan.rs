//! Scan command: analyze several components from one file.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use rampart_compliance::{AnalysisReport, BestPracticesAnalyzer, ComplianceGrade};

use super::analyze::print_report;
use super::input;
use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct ScanOutput<'a> {
    compliance_score: u32,
    grade: ComplianceGrade,
    report: &'a AnalysisReport,
}

/// Analyze every `{component, config}` entry in `path`.
pub(crate) fn run_scan(path: &Path, format: OutputFormat) -> Result<()> {
    let entries = input::read_component_list(path)?;
    if entries.is_empty() {
        println!("{}", Theme::warning("No components to scan."));
        return Ok(());
    }

    let analyzer = BestPracticesAnalyzer::new();
    let report = analyzer.analyze_all(&entries);
    let score = analyzer.compliance_score(&report);

    match format {
        OutputFormat::Json => print_json(&ScanOutput {
            compliance_score: score,
            grade: ComplianceGrade::from_score(score),
            report: &report,
        })?,
        OutputFormat::Markdown => print!("{}", analyzer.format_report_as_markdown(&report)),
        OutputFormat::Pretty => {
            print_report(
                &format!("Best practices: {} components", entries.len()),
                &report,
                score,
            );
            if let Some(components) = &report.components {
                println!("\n{}", Theme::header("Per component"));
                for c in components {
                    let grade = ComplianceGrade::from_score(c.compliance_score).to_string();
                    println!(
                        "  {:<12} {:>3} violation(s)  {}",
                        c.component,
                        c.violations_found,
                        Theme::score(c.compliance_score, &grade)
                    );
                }
            }
        },
    }
    Ok(())
}
