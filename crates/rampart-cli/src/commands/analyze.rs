//! Analyze command: score one component configuration.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use rampart_compliance::{
    AnalysisReport, AnalyzeOptions, BestPracticesAnalyzer, ComplianceGrade, Violation,
};
use rampart_core::{Category, Severity};

use super::input;
use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    component: &'a str,
    compliance_score: u32,
    grade: ComplianceGrade,
    report: &'a AnalysisReport,
}

/// Analyze the configuration at `config_path` as a `component`.
pub(crate) fn run_analyze(
    component: &str,
    config_path: &Path,
    categories: Vec<Category>,
    severities: Vec<Severity>,
    format: OutputFormat,
) -> Result<()> {
    let config = input::read_component_config(config_path)?;

    let mut options = AnalyzeOptions::new();
    if !categories.is_empty() {
        options = options.with_categories(categories);
    }
    if !severities.is_empty() {
        options = options.with_severities(severities);
    }

    let analyzer = BestPracticesAnalyzer::new();
    let report = analyzer.analyze(component, &config, &options);
    let score = analyzer.compliance_score(&report);

    match format {
        OutputFormat::Json => print_json(&AnalyzeOutput {
            component,
            compliance_score: score,
            grade: ComplianceGrade::from_score(score),
            report: &report,
        })?,
        OutputFormat::Markdown => print!("{}", analyzer.format_report_as_markdown(&report)),
        OutputFormat::Pretty => print_report(&format!("Best practices: {component}"), &report, score),
    }
    Ok(())
}

/// Print a report in the pretty format.
pub(crate) fn print_report(title: &str, report: &AnalysisReport, score: u32) {
    let grade = ComplianceGrade::from_score(score).to_string();

    println!("\n{}", Theme::header(title));
    println!("{}", Theme::separator());
    println!(
        "  {}",
        Theme::kv("Rules checked", &report.summary.total_rules_checked.to_string())
    );
    println!(
        "  {}",
        Theme::kv("Violations", &report.summary.violations_found.to_string())
    );
    println!("  {}", Theme::kv("Score", &Theme::score(score, &grade)));
    println!();

    if report.violations.is_empty() {
        println!("{}", Theme::success("No violations found."));
        return;
    }
    for violation in &report.violations {
        print_violation(violation);
    }
}

fn print_violation(v: &Violation) {
    println!(
        "  {} {} {} {}",
        Theme::severity(v.severity),
        v.rule_id,
        v.title,
        Theme::dimmed(&format!("[{}]", v.component))
    );
    if let Some(field) = &v.field {
        let value = v
            .value
            .as_ref()
            .map_or_else(|| "not set".to_string(), ToString::to_string);
        println!("           {}", Theme::dimmed(&format!("{field} = {value}")));
    }
    if !v.recommendation.is_empty() {
        println!("           {}", Theme::info(&v.recommendation));
    }
}
