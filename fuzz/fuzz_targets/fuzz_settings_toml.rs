//! Fuzz target for personal-data.toml parsing.
//!
//! Parsing and validation must handle arbitrary input without panicking, and
//! any settings that validate must also build a redactor.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_config::{validate_settings, Settings};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(settings) = Settings::parse_toml(text) else {
        return;
    };
    if validate_settings(&settings).is_ok() {
        assert!(settings.redaction.build_redactor().is_ok());
    }
});
