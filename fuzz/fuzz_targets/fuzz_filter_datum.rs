//! Fuzz target for `filter_datum`.
//!
//! Field names, token, separator and message are all attacker-shaped. The
//! call must never panic, and a second pass with the same arguments must not
//! change the output when the token is free of the separator.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pd_redact::filter_datum;

#[derive(Arbitrary, Debug)]
struct Input {
    fields: Vec<String>,
    redaction: String,
    message: String,
    separator: char,
}

fuzz_target!(|input: Input| {
    let once = filter_datum(&input.fields, &input.redaction, &input.message, input.separator);

    // Re-redaction is stable only when no field name can match inside the
    // token or inside another field's replacement.
    let simple = !input.redaction.contains(input.separator)
        && !input.redaction.contains('=')
        && input
            .fields
            .iter()
            .all(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_lowercase()))
        && input.fields.len() <= 1;
    if simple {
        let twice = filter_datum(&input.fields, &input.redaction, &once, input.separator);
        assert_eq!(once, twice);
    }
});
