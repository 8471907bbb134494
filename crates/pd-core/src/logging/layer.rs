//! Tracing layer that renders events through a redacting formatter.
//!
//! Each event becomes a [`LogRecord`]: the target is the logger name, the
//! `message` field is the text and every other field is appended as
//! `key=value;`. Fields whose key is sensitive get the token written in
//! directly, since their values may hold the separator. The record then goes
//! through the same formatter and redactor the user-data logger uses, which
//! covers pairs embedded in the message text.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::format::{LineFormatter, RedactingFormatter};
use super::record::LogRecord;
use super::sink::{Sink, StreamSink};
use pd_redact::FieldRedactor;

/// Collects an event's message and its fields as `key=value;` pairs.
struct PairVisitor<'r> {
    redactor: &'r FieldRedactor,
    message: Option<String>,
    pairs: String,
}

impl<'r> PairVisitor<'r> {
    fn new(redactor: &'r FieldRedactor) -> Self {
        Self {
            redactor,
            message: None,
            pairs: String::new(),
        }
    }

    fn push(&mut self, field: &Field, value: &dyn std::fmt::Display) {
        let name = field.name();
        let separator = self.redactor.separator();
        let _ = if self.redactor.covers_key(name) {
            write!(self.pairs, "{}={}{}", name, self.redactor.redaction(), separator)
        } else {
            write!(self.pairs, "{}={}{}", name, value, separator)
        };
    }

    fn into_message(self) -> String {
        match (self.message, self.pairs.is_empty()) {
            (Some(msg), true) => msg,
            (Some(msg), false) => format!("{} {}", msg, self.pairs),
            (None, _) => self.pairs,
        }
    }
}

impl Visit for PairVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.push(field, &rendered);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, &value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, &value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, &value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, &value);
    }
}

/// Layer emitting `[TAG] target LEVEL asctime: message` lines with PII
/// redacted.
pub struct RedactingLayer {
    formatter: Box<dyn LineFormatter>,
    redactor: FieldRedactor,
    sink: Arc<dyn Sink>,
}

impl RedactingLayer {
    /// Layer writing to stderr with the built-in PII redactor.
    pub fn stderr() -> Self {
        Self::new(RedactingFormatter::pii(), Arc::new(StreamSink::stderr()))
    }

    /// Structured fields are masked with the formatter's own redactor.
    pub fn new<F>(formatter: RedactingFormatter<F>, sink: Arc<dyn Sink>) -> Self
    where
        F: LineFormatter + 'static,
    {
        Self {
            redactor: formatter.redactor().clone(),
            formatter: Box::new(formatter),
            sink,
        }
    }
}

impl<S: Subscriber> Layer<S> for RedactingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = PairVisitor::new(&self.redactor);
        event.record(&mut visitor);

        let metadata = event.metadata();
        let record = LogRecord::new(
            metadata.target(),
            (*metadata.level()).into(),
            visitor.into_message(),
        );

        // A record that cannot be formatted is dropped rather than written raw.
        if let Ok(line) = self.formatter.format(&record) {
            let _ = self.sink.write_line(&line);
        }
    }
}
