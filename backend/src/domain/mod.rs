//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed entities for accounts and CGPA update
//! requests, plus the services that drive the approval workflow. Keep types
//! free of transport and persistence concerns; adapters live under
//! `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User and friends: identity, role, and academic profile.
//! - CgpaUpdateRequest and friends: the request lifecycle.
//! - CgpaWorkflowService, DashboardService, AccountService: driving port
//!   implementations.

pub mod accounts;
pub mod auth;
pub mod cgpa_request;
pub mod cgpa_workflow;
pub mod dashboard;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::accounts::AccountService;
pub use self::auth::{
    AccountValidationError, LoginCredentials, PASSWORD_MIN_LEN, Registration, RegistrationForm,
    RegistrationProfile,
};
pub use self::cgpa_request::{
    CgpaRequestId, CgpaRequestValidationError, CgpaSubmission, CgpaUpdateRequest, Decision,
    NewCgpaRequest, RequestStatus, SEMESTER_MAX, Semester, SupportingDocument,
};
pub use self::cgpa_workflow::{CgpaWorkflowService, WorkflowPolicy};
pub use self::dashboard::DashboardService;
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AcademicProfile, Cgpa, Department, Email, GENERAL_DEPARTMENT, LABEL_MAX, PersonName, Role,
    User, UserDraft, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use cgpa_portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
