//! Error types for the redaction crate.

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors raised while configuring a redactor.
///
/// Redacting text never fails; only building a field set or compiling
/// its matchers can.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// A field name violates the field set invariants.
    #[error("invalid field name {name:?}: {reason}")]
    InvalidField { name: String, reason: String },

    /// Failed to compile the matcher for a field.
    #[error("pattern error for field {field:?}: {message}")]
    PatternError { field: String, message: String },
}

impl RedactionError {
    pub(crate) fn invalid_field(name: &str, reason: impl Into<String>) -> Self {
        RedactionError::InvalidField {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
