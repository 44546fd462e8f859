//! Rampart CLI - infrastructure safety and compliance checks.
//!
//! Scores component configurations against the built-in best-practice
//! rules, applies automatic remediations, and assesses infrastructure
//! operations against the safety policy before they run.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod formatter;
mod theme;

use commands::{analyze, evaluate, fix, policy, rules, scan};
use formatter::OutputFormat;
use rampart_core::{Category, Severity};
use theme::Theme;

/// Exit code for `evaluate --strict` when the operation did not pass.
const EXIT_NOT_PASSED: u8 = 2;

/// Rampart - infrastructure safety and compliance policy engine
#[derive(Parser)]
#[command(name = "rampart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Also write logs to rolling files in this directory
    #[arg(long, global = true, env = "RAMPART_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one component configuration against the best-practice rules
    Analyze {
        /// Component type (e.g. rds, s3, eks)
        component: String,

        /// Configuration file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Only evaluate rules in these categories
        #[arg(long)]
        category: Vec<Category>,

        /// Only evaluate rules with these severities
        #[arg(long)]
        severity: Vec<Severity>,
    },

    /// Check every component listed in a file
    Scan {
        /// File holding `{component, config}` entries
        file: PathBuf,
    },

    /// Apply automatic fixes to a component configuration
    Fix {
        /// Component type (e.g. rds, s3, eks)
        component: String,

        /// Configuration file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Only apply fixes for these rule ids
        #[arg(long)]
        rule: Vec<String>,

        /// Write the fixed configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered compliance rules
    Rules {
        /// Only list rules in this category
        #[arg(long)]
        category: Option<Category>,

        /// Only list rules that apply to this component type
        #[arg(long)]
        component: Option<String>,
    },

    /// Assess an infrastructure operation before it runs
    Evaluate {
        /// Operation name (e.g. "terraform destroy")
        #[arg(short, long)]
        operation: String,

        /// Tool that runs the operation (e.g. terraform, kubectl)
        #[arg(short, long)]
        tool: String,

        /// Target environment
        #[arg(short, long)]
        env: Option<String>,

        /// Estimated cost of the operation
        #[arg(long)]
        cost: Option<f64>,

        /// File holding the tool's plan output
        #[arg(long)]
        plan_file: Option<PathBuf>,

        /// Affected resource identifier (repeatable)
        #[arg(long = "resource")]
        resources: Vec<String>,

        /// Safety policy file (defaults to the conventional locations)
        #[arg(long, env = "RAMPART_SAFETY_POLICY")]
        policy: Option<PathBuf>,

        /// Exit with status 2 when the operation does not pass
        #[arg(long)]
        strict: bool,
    },

    /// Show the effective safety policy
    Policy {
        /// Safety policy file (defaults to the conventional locations)
        #[arg(long, env = "RAMPART_SAFETY_POLICY")]
        policy: Option<PathBuf>,

        /// Fail if the given policy file cannot be loaded
        #[arg(long)]
        check: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let mut log_config = rampart_telemetry::LogConfig::new(level).with_env_override();
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_file_logging(dir);
    }
    if let Err(e) = rampart_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let format = cli.format;

    match cli.command {
        Commands::Analyze {
            component,
            config,
            category,
            severity,
        } => analyze::run_analyze(&component, &config, category, severity, format)?,
        Commands::Scan { file } => scan::run_scan(&file, format)?,
        Commands::Fix {
            component,
            config,
            rule,
            output,
        } => fix::run_fix(&component, &config, rule, output.as_deref(), format)?,
        Commands::Rules {
            category,
            component,
        } => rules::run_rules(category, component.as_deref(), format)?,
        Commands::Evaluate {
            operation,
            tool,
            env,
            cost,
            plan_file,
            resources,
            policy,
            strict,
        } => {
            let args = evaluate::EvaluateArgs {
                operation,
                tool,
                environment: env,
                cost,
                plan_file,
                resources,
                policy,
            };
            let outcome = evaluate::run_evaluate(args, format)?;
            if strict && matches!(outcome, evaluate::EvaluateOutcome::Assessed { passed: false }) {
                return Ok(ExitCode::from(EXIT_NOT_PASSED));
            }
        },
        Commands::Policy { policy, check } => {
            policy::run_policy(policy.as_deref(), check, format)?;
        },
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "rampart",
            "evaluate",
            "--operation",
            "terraform destroy",
            "--tool",
            "terraform",
            "--env",
            "production",
            "--resource",
            "aws_instance.web",
            "--resource",
            "aws_instance.api",
            "--strict",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Evaluate {
                operation,
                env,
                resources,
                strict,
                ..
            } => {
                assert_eq!(operation, "terraform destroy");
                assert_eq!(env.as_deref(), Some("production"));
                assert_eq!(resources.len(), 2);
                assert!(strict);
            },
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_parse_analyze_filters() {
        let cli = Cli::try_parse_from([
            "rampart",
            "analyze",
            "rds",
            "--config",
            "db.toml",
            "--category",
            "security",
            "--severity",
            "critical",
            "--severity",
            "high",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                component,
                category,
                severity,
                ..
            } => {
                assert_eq!(component, "rds");
                assert_eq!(category, vec![Category::Security]);
                assert_eq!(severity, vec![Severity::Critical, Severity::High]);
            },
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = Cli::try_parse_from(["rampart", "rules", "--category", "bogus"]);
        assert!(result.is_err());
    }
}
