//! Personal-data core library.
//!
//! This library provides:
//! - The redacting line formatter and the `user_data` logger assembly
//! - Redacted diagnostics via `tracing`
//! - Logging of user rows from a CSV export
//! - Exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod exit_codes;
pub mod logging;
pub mod users;

pub use logging::{user_data_logger, Logger, RedactingFormatter};
