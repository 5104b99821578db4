//! Password hashing and verification using Argon2
//!
//! Uses the argon2id variant with default parameters. A plaintext mode is
//! kept for fixtures written against the legacy comparison.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use clap::ValueEnum;

use crate::types::ExplorerError;

/// How registration stores passwords and login compares them
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PasswordMode {
    Argon2,
    Plaintext,
}

impl PasswordMode {
    /// Produce the value stored in the user record
    pub fn seal(&self, password: &str) -> Result<String, ExplorerError> {
        match self {
            PasswordMode::Argon2 => hash_password(password),
            PasswordMode::Plaintext => Ok(password.to_string()),
        }
    }

    /// Compare a submitted password with the stored value
    pub fn matches(&self, password: &str, stored: &str) -> Result<bool, ExplorerError> {
        match self {
            PasswordMode::Argon2 => verify_password(password, stored),
            PasswordMode::Plaintext => Ok(password == stored),
        }
    }
}

/// Hash a password using Argon2id
///
/// Returns the PHC-formatted hash string that includes the salt and parameters.
pub fn hash_password(password: &str) -> Result<String, ExplorerError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ExplorerError::Auth(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ExplorerError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| ExplorerError::Auth(format!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
