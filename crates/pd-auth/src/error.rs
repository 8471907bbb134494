//! Error types for password hashing.

use thiserror::Error;

/// Result type for hashing operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while hashing a password.
///
/// Verification never returns an error; see [`crate::is_valid`].
#[derive(Error, Debug)]
pub enum AuthError {
    /// Work factor outside the range bcrypt accepts.
    #[error("cost {0} is outside the supported bcrypt range 4..=31")]
    InvalidCost(u32),

    /// The underlying hashing library failed.
    #[error("hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
