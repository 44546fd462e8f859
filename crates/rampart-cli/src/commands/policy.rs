//! Policy command: show the effective safety policy.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use rampart_safety::{SafetyPolicy, load_safety_policy_with_source, read_policy_file};

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct PolicyOutput<'a> {
    source: String,
    policy: &'a SafetyPolicy,
    invariant_gaps: Vec<String>,
}

/// Print the effective policy and where it came from.
///
/// With `check`, an explicit file must load cleanly; errors are reported
/// instead of silently falling back to defaults.
pub(crate) fn run_policy(path: Option<&Path>, check: bool, format: OutputFormat) -> Result<()> {
    if check && let Some(path) = path {
        read_policy_file(path)?;
    }

    let (policy, source) = load_safety_policy_with_source(path);
    let gaps = policy.invariant_gaps();

    match format {
        OutputFormat::Json => print_json(&PolicyOutput {
            source: source.to_string(),
            policy: &policy,
            invariant_gaps: gaps,
        })?,
        OutputFormat::Markdown => {
            println!("# Safety Policy\n");
            println!("**Source:** {source}\n");
            println!("```toml\n{}```", toml::to_string_pretty(&policy)?);
            if !gaps.is_empty() {
                println!("\n## Gaps\n");
                for gap in &gaps {
                    println!("- {gap}");
                }
            }
        },
        OutputFormat::Pretty => {
            println!("\n{}", Theme::header("Safety policy"));
            println!("{}", Theme::separator());
            println!("  {}", Theme::kv("Source", &source.to_string()));
            println!(
                "  {}",
                Theme::kv("Always require approval", &policy.always_require_approval.join(", "))
            );
            println!(
                "  {}",
                Theme::kv("Protected environments", &policy.protected_environments.join(", "))
            );
            println!(
                "  {}",
                Theme::kv("Skip safety for", &policy.skip_safety_for.join(", "))
            );
            println!(
                "  {}",
                Theme::kv("Cost threshold", &policy.cost_threshold.to_string())
            );
            for gap in &gaps {
                println!("{}", Theme::warning(&format!("default entry missing: {gap}")));
            }
        },
    }
    Ok(())
}
