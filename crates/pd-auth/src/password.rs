//! Salted bcrypt hashing.
//!
//! Hashes are self-describing (`$2b$<cost>$<salt><digest>`), so verifying a
//! password needs nothing but the stored hash.

use crate::error::{AuthError, Result};
use serde::Serialize;

/// Default bcrypt work factor.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Password hasher with a fixed work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Hasher using [`DEFAULT_COST`].
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Hasher with an explicit work factor.
    pub fn with_cost(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salt and hash `password`. Each call draws a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password.as_bytes(), self.cost)?)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Salt and hash `password` at the default cost.
pub fn hash_password(password: &str) -> Result<String> {
    PasswordHasher::new().hash(password)
}

/// Check `password` against a stored bcrypt hash.
///
/// A malformed or unsupported hash verifies as `false`.
pub fn is_valid(hashed_password: &str, password: &str) -> bool {
    bcrypt::verify(password.as_bytes(), hashed_password).unwrap_or(false)
}
