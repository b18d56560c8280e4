//! Driving ports for account use-cases.
//!
//! Inbound adapters call these to authenticate, register, and resolve the
//! signed-in user without importing any persistence or hashing adapter.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Authenticate credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the user matching `credentials` or `401 Unauthorized`.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Create accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new student or faculty member.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}

/// Resolve the user behind a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrentUserQuery: Send + Sync {
    /// Fetch the profile for `user_id`, or `404` when it no longer exists.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
