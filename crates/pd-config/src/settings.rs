//! Settings for the redacting logger.
//!
//! Settings are read once when the logger is assembled. Every key is
//! optional; missing keys fall back to the fixed user-data assembly:
//!
//! ```toml
//! [logging]
//! tag = "HOLBERTON"
//! logger_name = "user_data"
//! level = "info"
//! template = "[{tag}] {name} {level} {asctime}: {message}"
//! timestamp_format = "%Y-%m-%d %H:%M:%S,%3f"
//!
//! [redaction]
//! fields = ["name", "email", "phone", "ssn", "password"]
//! token = "***"
//! separator = ";"
//! ```

use std::path::{Path, PathBuf};

use pd_redact::{FieldRedactor, SensitiveFieldSet, PII_FIELDS, REDACTION, SEPARATOR};
use serde::{Deserialize, Serialize};

use crate::resolve::{resolve_config, ConfigSource};
use crate::validate::{validate_settings, ValidationError, ValidationResult};

/// Fixed tag identifying the application in every line.
pub const DEFAULT_TAG: &str = "HOLBERTON";

/// Name of the logger carrying user rows.
pub const DEFAULT_LOGGER_NAME: &str = "user_data";

/// Line layout. Placeholders: `{tag}`, `{name}`, `{level}`, `{asctime}`,
/// `{message}`; `{{` and `}}` are literal braces.
pub const DEFAULT_TEMPLATE: &str = "[{tag}] {name} {level} {asctime}: {message}";

/// Timestamp layout: date, time, comma, milliseconds.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub redaction: RedactionSettings,
}

/// How lines are rendered and filtered by severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Literal shown in brackets at the start of every line.
    pub tag: String,
    /// Logger name shown after the tag.
    pub logger_name: String,
    /// Minimum severity emitted.
    pub level: String,
    /// Line layout; must contain `{message}`.
    pub template: String,
    /// strftime layout of the timestamp.
    pub timestamp_format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            logger_name: DEFAULT_LOGGER_NAME.to_string(),
            level: "info".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Which fields are sensitive and how they are masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedactionSettings {
    pub fields: Vec<String>,
    pub token: String,
    pub separator: char,
}

impl Default for RedactionSettings {
    fn default() -> Self {
        Self {
            fields: PII_FIELDS.iter().map(|f| f.to_string()).collect(),
            token: REDACTION.to_string(),
            separator: SEPARATOR,
        }
    }
}

impl RedactionSettings {
    /// The configured fields as a validated set.
    pub fn field_set(&self) -> pd_redact::Result<SensitiveFieldSet> {
        SensitiveFieldSet::with_separator(self.fields.iter().cloned(), self.separator)
    }

    /// Compile a redactor for these settings.
    pub fn build_redactor(&self) -> pd_redact::Result<FieldRedactor> {
        FieldRedactor::new(self.field_set()?, self.token.clone(), self.separator)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn parse_toml(content: &str) -> ValidationResult<Self> {
        toml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Render settings back to TOML.
    pub fn to_toml(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ValidationError::SerializeError(e.to_string()))
    }
}

/// Settings together with where they were loaded from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve, load and validate settings.
///
/// An explicit CLI path that does not exist is an error rather than a
/// silent fallback to defaults.
pub fn load_settings(cli_path: Option<&Path>) -> ValidationResult<LoadedSettings> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    }

    let resolved = resolve_config(cli_path);
    let settings = match &resolved.path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    validate_settings(&settings)?;

    Ok(LoadedSettings {
        settings,
        path: resolved.path,
        source: resolved.source,
    })
}
