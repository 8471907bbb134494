//! Sensitive field names and the constants shared by every redactor.

use crate::error::{RedactionError, Result};
use serde::Serialize;

/// Fields treated as PII by the user-data logger.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Placeholder substituted for every sensitive value.
pub const REDACTION: &str = "***";

/// Character terminating a `field=value` pair in a rendered line.
pub const SEPARATOR: char = ';';

/// Ordered, immutable set of field names considered PII.
///
/// Order is preserved because fields are applied in sequence. Duplicates
/// are kept; they only cost an extra pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SensitiveFieldSet {
    names: Vec<String>,
}

impl SensitiveFieldSet {
    /// Build a field set for the default [`SEPARATOR`].
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_separator(names, SEPARATOR)
    }

    /// Build a field set whose names must not contain `separator`.
    pub fn with_separator<I, S>(names: I, separator: char) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for name in &names {
            check_name(name, separator)?;
        }
        Ok(Self { names })
    }

    /// The fixed PII set `{name, email, phone, ssn, password}`.
    pub fn pii() -> Self {
        Self {
            names: PII_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// An empty set; redacting with it is a no-op.
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Re-check every name against a separator other than the one used at
    /// construction.
    pub(crate) fn check_separator(&self, separator: char) -> Result<()> {
        self.names
            .iter()
            .try_for_each(|name| check_name(name, separator))
    }
}

impl Default for SensitiveFieldSet {
    fn default() -> Self {
        Self::pii()
    }
}

fn check_name(name: &str, separator: char) -> Result<()> {
    if name.is_empty() {
        return Err(RedactionError::invalid_field(name, "field name is empty"));
    }
    if name.contains(separator) {
        return Err(RedactionError::invalid_field(
            name,
            format!("field name contains the separator {separator:?}"),
        ));
    }
    Ok(())
}
