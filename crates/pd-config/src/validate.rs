//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::settings::{LoggingSettings, RedactionSettings, Settings};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Severity names accepted in `logging.level`, aliases included.
pub const LEVEL_NAMES: [&str; 7] = [
    "debug", "info", "warn", "warning", "error", "critical", "fatal",
];

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SerializeError(_) => 62,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
        }
    }

    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    validate_logging(&settings.logging)?;
    validate_redaction(&settings.redaction)?;
    Ok(())
}

fn validate_logging(logging: &LoggingSettings) -> ValidationResult<()> {
    validate_token("logging.tag", &logging.tag)?;
    validate_token("logging.logger_name", &logging.logger_name)?;

    if !LEVEL_NAMES.contains(&logging.level.to_lowercase().as_str()) {
        return Err(ValidationError::invalid(
            "logging.level",
            format!(
                "Must be one of {}, got {:?}",
                LEVEL_NAMES.join(", "),
                logging.level
            ),
        ));
    }

    if !logging.template.contains("{message}") {
        return Err(ValidationError::invalid(
            "logging.template",
            format!("Must contain {{message}}, got {:?}", logging.template),
        ));
    }

    if logging.timestamp_format.is_empty() {
        return Err(ValidationError::invalid(
            "logging.timestamp_format",
            "Must not be empty",
        ));
    }

    Ok(())
}

/// Tags and logger names are single tokens in the rendered line.
fn validate_token(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::invalid(field, "Must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid(
            field,
            format!("Must not contain whitespace, got {:?}", value),
        ));
    }
    Ok(())
}

fn validate_redaction(redaction: &RedactionSettings) -> ValidationResult<()> {
    let sep = redaction.separator;

    if sep == '=' || sep.is_alphanumeric() {
        return Err(ValidationError::invalid(
            "redaction.separator",
            format!("Must be punctuation other than '=', got {:?}", sep),
        ));
    }

    for (idx, field) in redaction.fields.iter().enumerate() {
        let name = format!("redaction.fields[{}]", idx);
        if field.is_empty() {
            return Err(ValidationError::invalid(name, "Must not be empty"));
        }
        if field.contains(sep) || field.contains('=') {
            return Err(ValidationError::invalid(
                name,
                format!("Must not contain {:?} or '=', got {:?}", sep, field),
            ));
        }
    }

    if redaction.token.contains(sep) || redaction.token.contains('=') {
        return Err(ValidationError::SemanticError(format!(
            "redaction.token {:?} would introduce new field pairs",
            redaction.token
        )));
    }

    Ok(())
}
