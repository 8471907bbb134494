//! Field redaction over rendered log lines.
//!
//! A sensitive pair is `field=value`, where `value` is one or more characters
//! up to (not including) the next separator or the end of the line. The value
//! is replaced by the redaction token; the field name, the `=` and the
//! separator that follows are kept as they were.
//!
//! Field names match literally and case-sensitively, and a name matches
//! anywhere in the line: `name` also hits the tail of `username=...`.
//! A value cannot contain the separator. When one does, only the part before
//! the first separator is redacted.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::error::{RedactionError, Result};
use crate::field_set::{SensitiveFieldSet, REDACTION, SEPARATOR};

static PII_REDACTOR: Lazy<FieldRedactor> = Lazy::new(|| {
    FieldRedactor::new(SensitiveFieldSet::pii(), REDACTION, SEPARATOR)
        .expect("built-in PII field patterns compile")
});

/// Redact `fields` in `message`, compiling the matchers on the fly.
///
/// Fields are applied strictly in the order given. This never fails: an
/// empty field list or an empty message returns the message unchanged, and
/// an empty `redaction` blanks the values.
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: char,
) -> String {
    let mut out = Cow::Borrowed(message);
    for field in fields {
        let field = field.as_ref();
        let next = match FieldMatcher::compile(field, redaction, separator) {
            Ok(matcher) => match matcher.replace(&out) {
                Cow::Owned(s) => s,
                Cow::Borrowed(_) => continue,
            },
            Err(_) => redact_literal(&out, field, redaction, separator),
        };
        out = Cow::Owned(next);
    }
    out.into_owned()
}

/// Redact the built-in PII fields with the default token and separator.
pub fn redact_pii(message: &str) -> String {
    PII_REDACTOR.redact(message)
}

/// Compiled matcher for a single field.
#[derive(Debug, Clone)]
struct FieldMatcher {
    field: String,
    pattern: Regex,
    replacement: String,
}

impl FieldMatcher {
    fn compile(field: &str, redaction: &str, separator: char) -> Result<Self> {
        let pattern =
            Regex::new(&field_pattern(field, separator)).map_err(|e| {
                RedactionError::PatternError {
                    field: field.to_string(),
                    message: e.to_string(),
                }
            })?;
        Ok(Self {
            field: field.to_string(),
            pattern,
            replacement: format!("{field}={redaction}"),
        })
    }

    fn replace<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, NoExpand(&self.replacement))
    }
}

fn field_pattern(field: &str, separator: char) -> String {
    let mut buf = [0u8; 4];
    format!(
        "{}=[^{}]+",
        regex::escape(field),
        regex::escape(separator.encode_utf8(&mut buf))
    )
}

/// Plain-scan equivalent of the compiled matcher, used when a pattern cannot
/// be compiled (e.g. a field name beyond the regex size limit).
fn redact_literal(message: &str, field: &str, redaction: &str, separator: char) -> String {
    let needle = format!("{field}=");
    let mut out = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(pos) = rest.find(&needle) {
        let value_start = pos + needle.len();
        let value_len = rest[value_start..]
            .find(separator)
            .unwrap_or(rest.len() - value_start);

        if value_len == 0 {
            // No value here; resume one character after the match start.
            let step = pos + rest[pos..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&rest[..step]);
            rest = &rest[step..];
            continue;
        }

        out.push_str(&rest[..pos]);
        out.push_str(&needle);
        out.push_str(redaction);
        rest = &rest[value_start + value_len..];
    }

    out.push_str(rest);
    out
}

/// Redactor with one compiled matcher per configured field.
///
/// Built once at configuration time; read-only afterwards, so a single
/// instance can be shared across threads without locking.
#[derive(Debug, Clone)]
pub struct FieldRedactor {
    fields: SensitiveFieldSet,
    redaction: String,
    separator: char,
    matchers: Vec<FieldMatcher>,
}

impl FieldRedactor {
    /// Compile a redactor for `fields`.
    ///
    /// Fails when a field name contains `separator` or its matcher cannot be
    /// compiled.
    pub fn new(
        fields: SensitiveFieldSet,
        redaction: impl Into<String>,
        separator: char,
    ) -> Result<Self> {
        fields.check_separator(separator)?;
        let redaction = redaction.into();
        let matchers = fields
            .iter()
            .map(|field| FieldMatcher::compile(field, &redaction, separator))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fields,
            redaction,
            separator,
            matchers,
        })
    }

    /// Redactor for the built-in PII fields, token and separator.
    pub fn pii() -> Self {
        PII_REDACTOR.clone()
    }

    pub fn fields(&self) -> &SensitiveFieldSet {
        &self.fields
    }

    pub fn redaction(&self) -> &str {
        &self.redaction
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Redact every configured field in `message`.
    pub fn redact(&self, message: &str) -> String {
        self.redact_cow(message).into_owned()
    }

    /// Like [`FieldRedactor::redact`], borrowing when nothing matched.
    pub fn redact_cow<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(message);
        for matcher in &self.matchers {
            let next = match matcher.replace(&out) {
                Cow::Owned(s) => s,
                Cow::Borrowed(_) => continue,
            };
            out = Cow::Owned(next);
        }
        out
    }

    /// Whether any configured field appears as a redactable pair in `message`.
    pub fn matches(&self, message: &str) -> bool {
        self.matchers.iter().any(|m| m.pattern.is_match(message))
    }

    /// Whether a structured key would be redacted if written as `key=value`.
    ///
    /// Uses the same substring rule as the text pass, so `hostname` is
    /// covered by `name`.
    pub fn covers_key(&self, key: &str) -> bool {
        self.fields.iter().any(|field| key.contains(field))
    }

    /// Names of the configured fields that occur as redactable pairs.
    pub fn matched_fields<'s>(&'s self, message: &str) -> Vec<&'s str> {
        self.matchers
            .iter()
            .filter(|m| m.pattern.is_match(message))
            .map(|m| m.field.as_str())
            .collect()
    }
}

impl Default for FieldRedactor {
    fn default() -> Self {
        Self::pii()
    }
}
