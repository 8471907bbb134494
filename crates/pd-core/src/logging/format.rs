//! Line formatters.
//!
//! [`BaseFormatter`] renders a [`LogRecord`] into a single line from a
//! template. [`RedactingFormatter`] wraps any [`LineFormatter`] and runs its
//! output through a [`FieldRedactor`], so redaction always sees the fully
//! rendered line.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
pub use pd_config::settings::DEFAULT_TEMPLATE;
use pd_config::settings::{DEFAULT_TAG, DEFAULT_TIMESTAMP_FORMAT};
use pd_redact::{FieldRedactor, SensitiveFieldSet, REDACTION, SEPARATOR};
use thiserror::Error;

use super::record::LogRecord;

/// Minimum width of the rendered timestamp.
const ASCTIME_WIDTH: usize = 15;

/// Errors raised while building or applying a formatter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The record cannot be rendered; no line is produced.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The template or timestamp layout is invalid.
    #[error("invalid template: {0}")]
    Template(String),
}

/// Renders a record into one line of text.
pub trait LineFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError>;
}

impl<F: LineFormatter + ?Sized> LineFormatter for Box<F> {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        (**self).format(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Tag,
    Name,
    Level,
    Asctime,
    Message,
}

impl Placeholder {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "tag" => Some(Placeholder::Tag),
            "name" => Some(Placeholder::Name),
            "level" => Some(Placeholder::Level),
            "asctime" => Some(Placeholder::Asctime),
            "message" => Some(Placeholder::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Parsed line template.
///
/// Placeholders are `{tag}`, `{name}`, `{level}`, `{asctime}` and
/// `{message}`; `{{` and `}}` stand for literal braces. `{message}` is
/// mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = src.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => key.push(ch),
                            None => {
                                return Err(FormatError::Template(format!(
                                    "unclosed placeholder {{{}",
                                    key
                                )))
                            }
                        }
                    }
                    let field = Placeholder::from_key(&key).ok_or_else(|| {
                        FormatError::Template(format!("unknown placeholder {{{}}}", key))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(FormatError::Template("unmatched '}'".to_string())),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.contains(&Segment::Field(Placeholder::Message)) {
            return Err(FormatError::Template(
                "template must contain {message}".to_string(),
            ));
        }

        Ok(Self { segments })
    }
}

impl Default for Template {
    fn default() -> Self {
        use Placeholder::*;
        Self {
            segments: vec![
                Segment::Literal("[".to_string()),
                Segment::Field(Tag),
                Segment::Literal("] ".to_string()),
                Segment::Field(Name),
                Segment::Literal(" ".to_string()),
                Segment::Field(Level),
                Segment::Literal(" ".to_string()),
                Segment::Field(Asctime),
                Segment::Literal(": ".to_string()),
                Segment::Field(Message),
            ],
        }
    }
}

/// Conventional line formatter: no redaction.
#[derive(Debug, Clone)]
pub struct BaseFormatter {
    tag: String,
    template: Template,
    timestamp_format: String,
}

impl BaseFormatter {
    /// Formatter using [`DEFAULT_TEMPLATE`] and the default timestamp layout.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            template: Template::default(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_template(mut self, template: &str) -> Result<Self, FormatError> {
        self.template = Template::parse(template)?;
        Ok(self)
    }

    /// Use a strftime layout for `{asctime}`.
    pub fn with_timestamp_format(mut self, format: &str) -> Result<Self, FormatError> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError::Template(format!(
                "invalid timestamp format {:?}",
                format
            )));
        }
        self.timestamp_format = format.to_string();
        Ok(self)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn asctime(&self, record: &LogRecord) -> Result<String, FormatError> {
        let mut ts = String::new();
        write!(ts, "{}", record.created.format(&self.timestamp_format)).map_err(|_| {
            FormatError::MalformedRecord("timestamp could not be rendered".to_string())
        })?;
        Ok(ts)
    }
}

impl Default for BaseFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

fn check_record(record: &LogRecord) -> Result<(), FormatError> {
    if record.name.is_empty() {
        return Err(FormatError::MalformedRecord(
            "record has no logger name".to_string(),
        ));
    }
    if record.name.chars().any(char::is_whitespace) {
        return Err(FormatError::MalformedRecord(format!(
            "logger name {:?} contains whitespace",
            record.name
        )));
    }
    Ok(())
}

impl LineFormatter for BaseFormatter {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        check_record(record)?;

        let mut line = String::with_capacity(record.message.len() + 64);
        for segment in &self.template.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Field(Placeholder::Tag) => line.push_str(&self.tag),
                Segment::Field(Placeholder::Name) => line.push_str(&record.name),
                Segment::Field(Placeholder::Level) => line.push_str(record.level.as_str()),
                Segment::Field(Placeholder::Asctime) => {
                    let ts = self.asctime(record)?;
                    line.push_str(&format!("{:<width$}", ts, width = ASCTIME_WIDTH));
                }
                Segment::Field(Placeholder::Message) => line.push_str(&record.message),
            }
        }
        Ok(line)
    }
}

/// Decorator that redacts the output of another formatter.
///
/// The wrapped formatter runs first; if it fails, its error is returned
/// unchanged and nothing is redacted or emitted.
#[derive(Debug, Clone)]
pub struct RedactingFormatter<F = BaseFormatter> {
    inner: F,
    redactor: FieldRedactor,
}

impl RedactingFormatter<BaseFormatter> {
    /// Default base formatter, redacting `fields` with the standard token
    /// and separator.
    pub fn new(fields: SensitiveFieldSet) -> pd_redact::Result<Self> {
        let redactor = FieldRedactor::new(fields, REDACTION, SEPARATOR)?;
        Ok(Self::wrap(BaseFormatter::default(), redactor))
    }

    /// Default base formatter redacting the built-in PII fields.
    pub fn pii() -> Self {
        Self::wrap(BaseFormatter::default(), FieldRedactor::pii())
    }
}

impl<F: LineFormatter> RedactingFormatter<F> {
    pub fn wrap(inner: F, redactor: FieldRedactor) -> Self {
        Self { inner, redactor }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn redactor(&self) -> &FieldRedactor {
        &self.redactor
    }
}

impl<F: LineFormatter> LineFormatter for RedactingFormatter<F> {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        let line = self.inner.format(record)?;
        Ok(self.redactor.redact(&line))
    }
}
