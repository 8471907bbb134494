//! Log records and severity levels.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Severity of a log record, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// Upper-case name as rendered in a line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" | "fatal" => Ok(Level::Critical),
            _ => Err(format!("unknown level: {}", s)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// A single log event as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the logger that produced the record.
    pub name: String,
    pub level: Level,
    /// Free-form text, possibly carrying `field=value;` pairs.
    pub message: String,
    pub created: DateTime<Local>,
}

impl LogRecord {
    /// Record stamped with the current local time.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            message: message.into(),
            created: Local::now(),
        }
    }

    /// Override the creation time.
    pub fn at(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }
}
