//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path →
//! system path → built-in defaults.

use std::path::{Path, PathBuf};

use crate::{APP_NAME, SETTINGS_FILENAME};

/// Environment variable holding a direct path to the settings file.
pub const ENV_CONFIG_PATH: &str = "PERSONAL_DATA_CONFIG";

/// Environment variable holding a directory containing the settings file.
pub const ENV_CONFIG_DIR: &str = "PERSONAL_DATA_CONFIG_DIR";

/// Discovered settings path and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPath {
    /// Path to the settings file (or None when defaults apply).
    pub path: Option<PathBuf>,

    /// Source of the path (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/personal-data/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolve the settings path using the standard resolution order.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `PERSONAL_DATA_CONFIG` (direct path)
/// 3. `PERSONAL_DATA_CONFIG_DIR` + file name
/// 4. XDG config directory (`~/.config/personal-data/`)
/// 5. System config (`/etc/personal-data/`)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    if let Some(path) = cli_path {
        if path.exists() {
            return found(path.to_path_buf(), ConfigSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(SETTINGS_FILENAME);
    if system_path.exists() {
        return found(system_path, ConfigSource::SystemConfig);
    }

    ConfigPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    ConfigPath {
        path: Some(path),
        source,
    }
}

/// Get the XDG config directory for personal-data.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
