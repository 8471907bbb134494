//! Redacting log formatting and logger assembly.
//!
//! Two concerns live here:
//! - the user-data logger: [`LogRecord`] → [`BaseFormatter`] →
//!   [`RedactingFormatter`] → [`Sink`], assembled by [`user_data_logger`];
//! - the toolkit's own diagnostics, emitted through `tracing` and redacted by
//!   the same engine before they reach stderr.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use pd_core::logging::{user_data_logger, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = user_data_logger(sink.clone());
//! logger.info("name=Bob;email=bob@x.com;last_login=2019;").unwrap();
//!
//! assert!(sink.lines()[0].ends_with(": name=***;email=***;last_login=2019;"));
//! ```
//!
//! stdout is reserved for command payloads; every log line goes to stderr.

pub mod config;
pub mod format;
pub mod layer;
pub mod logger;
pub mod record;
pub mod sink;
pub mod writer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use format::{BaseFormatter, FormatError, LineFormatter, RedactingFormatter, Template};
pub use layer::RedactingLayer;
pub use logger::{user_data_logger, LogError, Logger, USER_DATA_LOGGER};
pub use record::{Level, LogRecord};
pub use sink::{MemorySink, Sink, StreamSink};
pub use writer::{masked_fields, RedactingMakeWriter, RedactingWriter};

use std::sync::Arc;

use pd_redact::FieldRedactor;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global diagnostic subscriber.
///
/// The filter comes from [`LogConfig::filter_directives`], so `RUST_LOG` only
/// applies when neither `PD_LOG` nor a CLI level is set. Calling this twice
/// keeps the first subscriber.
pub fn init_logging(config: &LogConfig, redactor: FieldRedactor) {
    let filter = EnvFilter::try_new(config.filter_directives())
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let result = match config.format {
        LogFormat::Human => {
            // ANSI escapes would split `field=value` pairs, so colour is off.
            let fmt_layer = fmt::layer()
                .fmt_fields(masked_fields(redactor.clone()))
                .with_writer(RedactingMakeWriter::stderr(redactor))
                .with_target(false)
                .with_ansi(false);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Redacted => {
            let layer = RedactingLayer::new(
                RedactingFormatter::wrap(BaseFormatter::default(), redactor),
                Arc::new(StreamSink::stderr()),
            );
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "diagnostic subscriber already installed");
    }
}

