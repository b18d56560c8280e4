//! Port abstraction for the identity directory.
//!
//! Adapters resolve users by id or email, create accounts, and perform the
//! single targeted mutation the workflow needs: overwriting a student's cgpa.

use async_trait::async_trait;

use crate::domain::{Department, Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// Another faculty member already uses this faculty id.
        DuplicateFacultyId { faculty_id: String } =>
            "faculty id already registered: {faculty_id}",
    }
}

/// Port for user lookups and the cgpa write-back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch every user whose id appears in `ids`. Unknown ids are skipped and
    /// the result order is unspecified.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Insert a new user.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] or
    /// [`UserRepositoryError::DuplicateFacultyId`] on uniqueness clashes.
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// List students whose department equals `department`.
    async fn list_students_in_department(
        &self,
        department: &Department,
    ) -> Result<Vec<User>, UserRepositoryError>;
}
