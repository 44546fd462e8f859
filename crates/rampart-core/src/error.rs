//! Error types for parsing core vocabulary.

use thiserror::Error;

/// Errors raised when parsing core types from their string form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The string does not name a known severity.
    #[error("unknown severity '{0}'; expected one of: low, medium, high, critical")]
    UnknownSeverity(String),

    /// The string does not name a known category.
    #[error(
        "unknown category '{0}'; expected one of: security, cost, reliability, performance, compliance"
    )]
    UnknownCategory(String),
}

/// Result type for core parsing operations.
pub type CoreResult<T> = Result<T, CoreError>;
