//! Rules command: list the registered compliance rules.

use anyhow::Result;

use rampart_compliance::{BestPracticesAnalyzer, Rule, RuleSummary};
use rampart_core::Category;

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

/// List rules, optionally narrowed to one category and/or component type.
pub(crate) fn run_rules(
    category: Option<Category>,
    component: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let analyzer = BestPracticesAnalyzer::new();
    let registry = analyzer.registry();

    let rules: Vec<Rule> = match component {
        Some(c) => registry.rules_for_component(c),
        None => registry.rules(),
    }
    .into_iter()
    .filter(|r| category.is_none_or(|c| r.category == c))
    .collect();

    match format {
        OutputFormat::Json => {
            let summaries: Vec<RuleSummary> = rules.iter().map(Rule::summary).collect();
            print_json(&summaries)?;
        },
        OutputFormat::Markdown => {
            println!("| Id | Category | Severity | Title | Applies to | Autofix |");
            println!("|----|----------|----------|-------|------------|---------|");
            for rule in &rules {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    rule.id,
                    rule.category,
                    rule.severity,
                    rule.title,
                    applies_to_label(rule),
                    if rule.has_fix() { "yes" } else { "no" }
                );
            }
        },
        OutputFormat::Pretty => {
            println!("\n{}", Theme::header("Compliance rules"));
            println!("{}", Theme::separator());
            if rules.is_empty() {
                println!("{}", Theme::warning("No matching rules."));
                return Ok(());
            }
            for rule in &rules {
                let fix = if rule.has_fix() { " (autofix)" } else { "" };
                println!(
                    "  {} {:<8} {:<12} {}{}",
                    Theme::severity(rule.severity),
                    rule.id,
                    rule.category.as_str(),
                    rule.title,
                    Theme::dimmed(fix)
                );
                println!(
                    "           {}",
                    Theme::dimmed(&format!("applies to: {}", applies_to_label(rule)))
                );
            }
            println!("\n  {}", Theme::kv("Total", &rules.len().to_string()));
        },
    }
    Ok(())
}

fn applies_to_label(rule: &Rule) -> String {
    if rule.applies_to.is_empty() {
        "-".to_string()
    } else {
        rule.applies_to.join(", ")
    }
}
