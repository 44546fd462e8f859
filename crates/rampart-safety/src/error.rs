use std::path::PathBuf;

/// Errors raised by the safety layer.
///
/// The `Policy*` variants are produced by [`read_policy_file`]; the default
/// loader absorbs them into the built-in policy and never surfaces them.
///
/// [`read_policy_file`]: crate::loader::read_policy_file
#[derive(Debug, thiserror::Error)]
pub enum SafetyError {
    /// The safety context failed validation.
    #[error("invalid safety context: {field} {reason}")]
    InvalidContext {
        /// Offending context field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The policy file could not be read.
    #[error("failed to read policy file {path}: {source}")]
    PolicyRead {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The policy file could not be parsed.
    #[error("failed to parse policy file {path}: {message}")]
    PolicyParse {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The policy file exceeds the size limit.
    #[error("policy file {path} is {size} bytes, exceeding the {limit} byte limit")]
    PolicyTooLarge {
        /// File path.
        path: PathBuf,
        /// Actual size.
        size: u64,
        /// Maximum accepted size.
        limit: u64,
    },

    /// The policy file parsed but holds an unusable value.
    #[error("invalid policy value for {field}: {reason}")]
    PolicyInvalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for safety operations.
pub type SafetyResult<T> = Result<T, SafetyError>;
