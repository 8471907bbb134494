//! One-way credential hashing.
//!
//! A thin layer over bcrypt: passwords are salted and hashed for storage,
//! and verified against the stored hash. Nothing here can recover a password
//! from its hash.
//!
//! ```no_run
//! use pd_auth::{hash_password, is_valid};
//!
//! let stored = hash_password("hunter2").unwrap();
//! assert!(is_valid(&stored, "hunter2"));
//! ```

pub mod error;
pub mod password;

pub use error::{AuthError, Result};
pub use password::{hash_password, is_valid, PasswordHasher, DEFAULT_COST, MAX_COST, MIN_COST};
