//! Writer adapter that redacts human-readable diagnostics.
//!
//! The `fmt` layer asks for a fresh writer per event and writes the whole
//! rendered event into it. [`RedactingWriter`] buffers those bytes and only
//! passes them on, redacted line by line, when it is dropped.
//!
//! [`masked_fields`] renders structured fields as `key=value;` and writes the
//! token for sensitive keys, so the text pass never has to guess where a
//! space-separated value ends.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;

use pd_redact::FieldRedactor;
use tracing_subscriber::field::MakeExt;
use tracing_subscriber::fmt::format::{self, FormatFields};
use tracing_subscriber::fmt::MakeWriter;

/// Field formatter for the `fmt` layer that masks sensitive keys.
pub fn masked_fields(redactor: FieldRedactor) -> impl for<'w> FormatFields<'w> + Send + Sync + 'static {
    let redactor = Arc::new(redactor);
    format::debug_fn(move |writer, field, value| {
        let name = field.name();
        let separator = redactor.separator();
        if name == "message" {
            write!(writer, "{:?}", value)
        } else if redactor.covers_key(name) {
            write!(writer, "{}={}{}", name, redactor.redaction(), separator)
        } else {
            write!(writer, "{}={:?}{}", name, value, separator)
        }
    })
    .delimited(" ")
}

/// `MakeWriter` producing [`RedactingWriter`]s over a shared target.
pub struct RedactingMakeWriter<M> {
    inner: M,
    redactor: Arc<FieldRedactor>,
}

impl RedactingMakeWriter<fn() -> io::Stderr> {
    pub fn stderr(redactor: FieldRedactor) -> Self {
        Self::new(io::stderr as fn() -> io::Stderr, redactor)
    }
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, redactor: FieldRedactor) -> Self {
        Self {
            inner,
            redactor: Arc::new(redactor),
        }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            buf: Vec::new(),
            target: self.inner.make_writer(),
            redactor: Arc::clone(&self.redactor),
        }
    }
}

/// Buffers one event and writes it redacted on drop.
pub struct RedactingWriter<W: Write> {
    buf: Vec<u8>,
    target: W,
    redactor: Arc<FieldRedactor>,
}

impl<W: Write> RedactingWriter<W> {
    fn drain(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buf);
        // Values never run past a line end.
        for line in text.split_inclusive('\n') {
            let body = line.trim_end_matches(['\r', '\n']);
            self.target.write_all(self.redactor.redact_cow(body).as_bytes())?;
            self.target.write_all(line[body.len()..].as_bytes())?;
        }
        self.buf.clear();
        self.target.flush()
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = self.drain();
    }
}
