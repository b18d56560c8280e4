//! Port for credential hashing.
//!
//! The domain never compares raw passwords itself; it asks a hasher to
//! produce or check a PHC-formatted hash.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hash generation failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes and verifies passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHasherError>;
}

/// Reversible stand-in hasher for tests and fixtures. Never use with real
/// credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("{FIXTURE_PREFIX}{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHasherError> {
        let Some(expected) = stored_hash.strip_prefix(FIXTURE_PREFIX) else {
            return Err(PasswordHasherError::malformed_hash("missing fixture prefix"));
        };
        Ok(expected == password)
    }
}
