//! Evaluate command: assess an infrastructure operation before it runs.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use rampart_safety::{
    SafetyAssessment, SafetyContext, SafetyEvaluator, format_assessment_as_markdown,
};

use crate::formatter::{OutputFormat, print_json};
use crate::theme::Theme;

/// Arguments of the evaluate command.
pub(crate) struct EvaluateArgs {
    pub(crate) operation: String,
    pub(crate) tool: String,
    pub(crate) environment: Option<String>,
    pub(crate) cost: Option<f64>,
    pub(crate) plan_file: Option<PathBuf>,
    pub(crate) resources: Vec<String>,
    pub(crate) policy: Option<PathBuf>,
}

/// Outcome reported back to `main` for exit-code selection.
pub(crate) enum EvaluateOutcome {
    /// The operation is exempt from safety checks.
    Skipped,
    /// The operation was assessed.
    Assessed { passed: bool },
}

#[derive(Serialize)]
struct SkippedOutput<'a> {
    operation: &'a str,
    safety_check_required: bool,
}

/// Evaluate one operation against the effective safety policy.
///
/// An operation the policy exempts from safety checks is still assessed;
/// the exemption is honored only when that assessment passes.
pub(crate) fn run_evaluate(args: EvaluateArgs, format: OutputFormat) -> Result<EvaluateOutcome> {
    let evaluator = SafetyEvaluator::from_policy_file(args.policy.as_deref());
    tracing::debug!(source = %evaluator.source(), "Using safety policy");

    let context = build_context(args)?;
    let (assessment, exempt) = assess(&evaluator, &context)?;

    if exempt {
        match format {
            OutputFormat::Json => print_json(&SkippedOutput {
                operation: &context.operation,
                safety_check_required: false,
            })?,
            OutputFormat::Markdown => println!(
                "# Safety Assessment\n\n**Operation:** {}\n\nExempt from safety checks by policy.",
                context.operation
            ),
            OutputFormat::Pretty => println!(
                "{}",
                Theme::info(&format!(
                    "'{}' is exempt from safety checks by policy",
                    context.operation
                ))
            ),
        }
        return Ok(EvaluateOutcome::Skipped);
    }

    if !evaluator.requires_safety_check(&context.operation) {
        tracing::warn!(
            operation = %context.operation,
            "Operation matches a skip entry but did not pass; exemption ignored"
        );
        if format == OutputFormat::Pretty {
            println!(
                "{}",
                Theme::warning("Policy exemption ignored: the operation did not pass")
            );
        }
    }

    match format {
        OutputFormat::Json => print_json(&assessment)?,
        OutputFormat::Markdown => print!("{}", format_assessment_as_markdown(&assessment)),
        OutputFormat::Pretty => print_assessment(&assessment),
    }

    Ok(EvaluateOutcome::Assessed {
        passed: assessment.passed,
    })
}

/// Assess `context` and decide whether a policy exemption applies.
fn assess(
    evaluator: &SafetyEvaluator,
    context: &SafetyContext,
) -> Result<(SafetyAssessment, bool)> {
    let assessment = evaluator.evaluate_safety(context)?;
    let exempt = !evaluator.requires_safety_check(&context.operation) && assessment.passed;
    Ok((assessment, exempt))
}

fn build_context(args: EvaluateArgs) -> Result<SafetyContext> {
    let mut context = SafetyContext::new(args.operation, args.tool)
        .with_affected_resources(args.resources);
    if let Some(env) = args.environment {
        context = context.with_environment(env);
    }
    if let Some(cost) = args.cost {
        context = context.with_estimated_cost(cost);
    }
    if let Some(path) = args.plan_file.as_deref() {
        context = context.with_plan_output(read_plan(path)?);
    }
    Ok(context)
}

fn read_plan(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan output {}", path.display()))
}

fn print_assessment(assessment: &SafetyAssessment) {
    println!(
        "\n{}",
        Theme::header(&format!("Safety assessment: {}", assessment.operation))
    );
    println!("{}", Theme::separator());

    if assessment.risks.is_empty() {
        println!("  {}", Theme::dimmed("No risks identified."));
    }
    for risk in &assessment.risks {
        let marker = if assessment.blockers.contains(&risk.id) {
            " (blocker)"
        } else {
            ""
        };
        println!(
            "  {} {}{}",
            Theme::severity(risk.severity),
            risk.id,
            Theme::dimmed(marker)
        );
        println!("           {}", risk.description);
        for mitigation in &risk.mitigations {
            println!("           {}", Theme::dimmed(&format!("- {mitigation}")));
        }
    }

    if !assessment.affected_resources.is_empty() {
        println!(
            "\n  {}",
            Theme::kv("Affected", &assessment.affected_resources.join(", "))
        );
    }
    println!();

    if assessment.passed {
        println!("{}", Theme::success("Safety check passed"));
    } else if assessment.requires_approval {
        println!(
            "{}",
            Theme::warning("Human approval required before this operation runs")
        );
    } else {
        println!("{}", Theme::error("Safety check failed"));
    }
}
