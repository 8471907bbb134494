//! Fuzz target for the redacting line formatter.
//!
//! Arbitrary logger names and messages must either format or fail with an
//! error; a formatted line never keeps a PII value that was written as a
//! complete `field=value;` pair.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_core::logging::{Level, LineFormatter, LogRecord, RedactingFormatter};

fuzz_target!(|data: (String, String)| {
    let (name, value) = data;
    let formatter = RedactingFormatter::pii();

    let _ = formatter.format(&LogRecord::new(name.as_str(), Level::Info, value.as_str()));

    if !value.is_empty() && !value.contains(';') {
        let message = format!("ssn={value};");
        if let Ok(line) = formatter.format(&LogRecord::new("user_data", Level::Info, message)) {
            assert!(line.ends_with(": ssn=***;"));
        }
    }
});
