/// Errors raised by the rule registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComplianceError {
    /// A rule with the same identifier is already registered.
    #[error("duplicate rule: '{id}' is already registered")]
    DuplicateRule {
        /// The conflicting rule identifier.
        id: String,
    },
}

/// Result type for compliance operations.
pub type ComplianceResult<T> = Result<T, ComplianceError>;
