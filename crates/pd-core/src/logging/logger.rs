//! Logger assembly.
//!
//! A [`Logger`] is an immutable value: name, severity threshold, one
//! formatter and one sink, all fixed at construction. There is no registry
//! and no parent logger, so a record is emitted at most once, by the logger
//! it was handed to.

use std::io;
use std::sync::Arc;

use pd_config::Settings;
use pd_redact::RedactionError;
use thiserror::Error;

use super::format::{BaseFormatter, FormatError, LineFormatter, RedactingFormatter};
use super::record::{Level, LogRecord};
use super::sink::Sink;

/// Name of the logger carrying user rows.
pub const USER_DATA_LOGGER: &str = "user_data";

/// Errors surfaced by [`Logger`].
#[derive(Error, Debug)]
pub enum LogError {
    /// The record could not be formatted; nothing was written.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The sink rejected the line.
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),

    /// The redaction settings are unusable.
    #[error(transparent)]
    Redaction(#[from] RedactionError),

    #[error("invalid level: {0}")]
    InvalidLevel(String),
}

/// A named logger with exactly one formatter and one sink.
pub struct Logger {
    name: String,
    threshold: Level,
    formatter: Box<dyn LineFormatter>,
    sink: Arc<dyn Sink>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(
        name: impl Into<String>,
        threshold: Level,
        formatter: impl LineFormatter + 'static,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            name: name.into(),
            threshold,
            formatter: Box::new(formatter),
            sink,
        }
    }

    /// Assemble a redacting logger from loaded settings.
    pub fn from_settings(settings: &Settings, sink: Arc<dyn Sink>) -> Result<Self, LogError> {
        let threshold = settings
            .logging
            .level
            .parse::<Level>()
            .map_err(LogError::InvalidLevel)?;
        let base = BaseFormatter::new(settings.logging.tag.clone())
            .with_template(&settings.logging.template)?
            .with_timestamp_format(&settings.logging.timestamp_format)?;
        let redactor = settings.redaction.build_redactor()?;

        Ok(Self::new(
            settings.logging.logger_name.clone(),
            threshold,
            RedactingFormatter::wrap(base, redactor),
            sink,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.threshold
    }

    /// Format and write a record if it meets the threshold.
    ///
    /// Returns whether a line was written. A formatting failure writes
    /// nothing.
    pub fn emit(&self, record: &LogRecord) -> Result<bool, LogError> {
        if !self.is_enabled_for(record.level) {
            return Ok(false);
        }
        let line = self.formatter.format(record)?;
        self.sink.write_line(&line)?;
        Ok(true)
    }

    /// Log `message` under this logger's name.
    pub fn log(&self, level: Level, message: &str) -> Result<bool, LogError> {
        if !self.is_enabled_for(level) {
            return Ok(false);
        }
        self.emit(&LogRecord::new(self.name.as_str(), level, message))
    }

    pub fn debug(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::Info, message)
    }

    pub fn warning(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::Error, message)
    }

    pub fn critical(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::Critical, message)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// The user-data logger: INFO and above, PII fields redacted, one sink.
pub fn user_data_logger(sink: Arc<dyn Sink>) -> Logger {
    Logger::new(USER_DATA_LOGGER, Level::Info, RedactingFormatter::pii(), sink)
}
