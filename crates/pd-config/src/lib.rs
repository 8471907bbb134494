//! Configuration loading and validation for the personal-data toolkit.
//!
//! This crate provides:
//! - Typed settings for the redacting logger (`personal-data.toml`)
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation of settings
//! - Database connection settings read from the environment

pub mod db;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use db::DbSettings;
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use settings::{load_settings, LoadedSettings, LoggingSettings, RedactionSettings, Settings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Application name used for config directories.
pub const APP_NAME: &str = "personal-data";

/// Standard settings file name.
pub const SETTINGS_FILENAME: &str = "personal-data.toml";
