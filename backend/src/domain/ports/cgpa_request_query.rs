//! Driving port for read-only request listings.

use async_trait::async_trait;

use crate::domain::{CgpaUpdateRequest, Department, Email, Error, RequestStatus, User, UserId};

/// Display fields of a user referenced by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub department: Option<Department>,
    pub student_number: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            first_name: user.first_name().as_ref().to_owned(),
            last_name: user.last_name().as_ref().to_owned(),
            email: user.email().clone(),
            department: user.department().cloned(),
            student_number: user.student_number().map(str::to_owned),
        }
    }
}

/// A request enriched with its student and reviewer.
///
/// Either summary is `None` if the referenced user no longer resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    pub request: CgpaUpdateRequest,
    pub student: Option<UserSummary>,
    pub reviewer: Option<UserSummary>,
}

/// Request listings scoped to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CgpaRequestQuery: Send + Sync {
    /// Requests in the faculty member's department with `status` (pending
    /// when `None`), newest first.
    async fn department_queue(
        &self,
        faculty_id: &UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<RequestView>, Error>;

    /// Every request authored by the student, newest first.
    async fn student_requests(&self, student_id: &UserId) -> Result<Vec<RequestView>, Error>;
}
