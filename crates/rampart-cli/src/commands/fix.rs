//! Fix command: apply available remediations to a configuration.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use rampart_compliance::{AutofixOptions, AutofixResult, BestPracticesAnalyzer};

use super::analyze::print_report;
use super::input;
use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct FixOutput<'a> {
    compliance_score: u32,
    #[serde(flatten)]
    result: &'a AutofixResult,
}

/// Autofix the configuration at `config_path`.
///
/// The fixed configuration goes to `output` when given (format chosen by
/// its extension), otherwise it is printed in the input's format.
pub(crate) fn run_fix(
    component: &str,
    config_path: &Path,
    rule_ids: Vec<String>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let config = input::read_component_config(config_path)?;

    let mut options = AutofixOptions::new();
    if !rule_ids.is_empty() {
        options = options.with_rule_ids(rule_ids);
    }

    let analyzer = BestPracticesAnalyzer::new();
    let result = analyzer.autofix(component, &config, &options);
    let score = analyzer.compliance_score(&result.violations_remaining);

    if let Some(path) = output {
        let rendered = input::render_config(path, &result.fixed_config)?;
        std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => print_json(&FixOutput {
            compliance_score: score,
            result: &result,
        })?,
        OutputFormat::Markdown => {
            println!("# Autofix: {component}\n");
            for id in &result.applied_fixes {
                println!("- applied `{id}`");
            }
            println!();
            print!(
                "{}",
                analyzer.format_report_as_markdown(&result.violations_remaining)
            );
        },
        OutputFormat::Pretty => {
            if result.changed() {
                for id in &result.applied_fixes {
                    println!("{}", Theme::success(&format!("applied {id}")));
                }
            } else {
                println!("{}", Theme::info("No fixes applied."));
            }
            match output {
                Some(path) => println!(
                    "{}",
                    Theme::info(&format!("fixed configuration written to {}", path.display()))
                ),
                None => {
                    println!("\n{}", Theme::header("Fixed configuration"));
                    println!(
                        "{}",
                        input::render_config(config_path, &result.fixed_config)?
                    );
                },
            }
            print_report("Remaining violations", &result.violations_remaining, score);
        },
    }
    Ok(())
}
