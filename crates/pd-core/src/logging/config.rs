//! Diagnostic logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (PD_LOG, RUST_LOG, PD_LOG_FORMAT)
//! - CLI flags (-v/-q, --log-format)

use serde::{Deserialize, Serialize};

/// Environment variable selecting the diagnostic level.
pub const ENV_LOG: &str = "PD_LOG";

/// Environment variable selecting the diagnostic format.
pub const ENV_LOG_FORMAT: &str = "PD_LOG_FORMAT";

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `tracing` console format, redacted (default).
    #[default]
    Human,
    /// Same line layout as the user-data logger.
    Redacted,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "redacted" | "line" | "tagged" => Ok(LogFormat::Redacted),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Redacted => write!(f, "redacted"),
        }
    }
}

/// Diagnostic level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Warnings and errors (default).
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Move `steps` levels towards `Trace`.
    pub fn more_verbose(self, steps: u8) -> Self {
        let mut level = self;
        for _ in 0..steps {
            level = match level {
                LogLevel::Off => LogLevel::Error,
                LogLevel::Error => LogLevel::Warn,
                LogLevel::Warn => LogLevel::Info,
                LogLevel::Info => LogLevel::Debug,
                LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
            };
        }
        level
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Off => tracing_subscriber::filter::LevelFilter::OFF,
        }
    }
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Include timestamps in human output.
    pub timestamps: bool,
    /// Raw `RUST_LOG` directives, kept only when neither `PD_LOG` nor a CLI
    /// level was given.
    pub env_directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: true,
            env_directives: None,
        }
    }
}

impl LogConfig {
    /// Create config from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Like [`LogConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        // CLI level > PD_LOG > RUST_LOG
        if let Some(val) = lookup(ENV_LOG) {
            if let Ok(level) = val.parse::<LogLevel>() {
                config.level = level;
            }
        } else if let Some(val) = lookup("RUST_LOG") {
            if val.contains("trace") {
                config.level = LogLevel::Trace;
            } else if val.contains("debug") {
                config.level = LogLevel::Debug;
            } else if val.contains("info") {
                config.level = LogLevel::Info;
            } else if val.contains("error") {
                config.level = LogLevel::Error;
            }
            config.env_directives = Some(val);
        }

        if let Some(val) = lookup(ENV_LOG_FORMAT) {
            if let Ok(format) = val.parse::<LogFormat>() {
                config.format = format;
            }
        }

        if let Some(level) = cli_level {
            config = config.with_level(level);
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self.env_directives = None;
        self
    }

    /// `EnvFilter` directives for this config.
    pub fn filter_directives(&self) -> String {
        self.env_directives
            .clone()
            .unwrap_or_else(|| self.level.to_string())
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}
