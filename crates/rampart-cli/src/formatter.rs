//! Output format selection and shared printing helpers.

use clap::ValueEnum;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Colored, human-readable text.
    #[default]
    Pretty,
    /// Pretty-printed JSON.
    Json,
    /// Markdown report.
    Markdown,
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
