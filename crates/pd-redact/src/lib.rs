//! Field-level PII redaction for rendered log lines.
//!
//! Log lines carry data as `field=value;` pairs. This crate rewrites the
//! value of every pair whose field is declared sensitive, leaving the rest of
//! the line byte-for-byte intact.
//!
//! # Key Features
//!
//! - **Literal field matching**: field names are matched exactly and
//!   case-sensitively; regex metacharacters in names carry no meaning.
//! - **Compiled matcher cache**: [`FieldRedactor`] compiles one matcher per
//!   field up front and reuses it for every line.
//! - **Total**: redacting never fails. Only building a redactor can.
//! - **Deterministic**: fields apply in declaration order.
//!
//! # Example
//!
//! ```
//! use pd_redact::{filter_datum, FieldRedactor, SensitiveFieldSet};
//!
//! let line = filter_datum(&["email"], "***", "name=Bob;email=bob@x.com;", ';');
//! assert_eq!(line, "name=Bob;email=***;");
//!
//! let redactor = FieldRedactor::new(SensitiveFieldSet::pii(), "***", ';').unwrap();
//! assert_eq!(redactor.redact("ssn=123-45-6789;"), "ssn=***;");
//! ```

pub mod engine;
pub mod error;
pub mod field_set;

pub use engine::{filter_datum, redact_pii, FieldRedactor};
pub use error::{RedactionError, Result};
pub use field_set::{SensitiveFieldSet, PII_FIELDS, REDACTION, SEPARATOR};
