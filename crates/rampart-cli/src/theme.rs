//! CLI theme and styling.

use colored::Colorize;

use rampart_core::Severity;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a key-value pair.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Format a severity, padded for column alignment.
    pub(crate) fn severity(severity: Severity) -> String {
        let label = format!("{:<8}", severity.as_str());
        match severity {
            Severity::Low => label.green().to_string(),
            Severity::Medium => label.yellow().to_string(),
            Severity::High => label.red().to_string(),
            Severity::Critical => label.red().bold().to_string(),
        }
    }

    /// Format a compliance score with a color band.
    pub(crate) fn score(score: u32, grade: &str) -> String {
        let text = format!("{score}/100 ({grade})");
        match score {
            90.. => text.green().bold().to_string(),
            50..=89 => text.yellow().bold().to_string(),
            _ => text.red().bold().to_string(),
        }
    }
}
