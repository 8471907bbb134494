//! Exit codes for the pd-core CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

/// Exit codes for pd-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Password did not match the stored hash
    Mismatch = 1,

    /// Invalid arguments
    ArgsError = 10,

    /// Configuration missing, unreadable or invalid
    ConfigError = 11,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19, resolvable by the user.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Codes 20 and above.
    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Get the code name as a string constant.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::Mismatch => "ERR_MISMATCH",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
