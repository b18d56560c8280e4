//! The portal's error payload.
//!
//! [`Error`] doubles as the JSON body returned to clients, so it carries only
//! what a caller may see: a stable code, a message, the request's trace id,
//! and optional structured details. The HTTP adapter picks the status code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The acting identifier does not resolve to a faculty record.
    InvalidFaculty,
    /// The resource changed state underneath the caller.
    Conflict,
    /// A backing store is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// `new` captures the trace identifier in scope so that errors raised deep in
/// a service still correlate with the request that triggered them.
///
/// # Examples
/// ```
/// use cgpa_portal::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary structured details, e.g. `{"field": "newCgpa"}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

macro_rules! code_constructors {
    ($($(#[$meta:meta])* $name:ident => $code:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    /// Build an error, stamping it with the trace id of the current request.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    code_constructors! {
        /// Validation failure; pair with [`Error::with_details`] to name the field.
        invalid_request => InvalidRequest,
        /// Missing or unusable session.
        unauthorized => Unauthorized,
        /// The caller may not act on this resource.
        forbidden => Forbidden,
        not_found => NotFound,
        /// The acting id is not a faculty record.
        invalid_faculty => InvalidFaculty,
        /// Duplicate account or a request that is no longer pending.
        conflict => Conflict,
        /// A backing store could not be reached.
        service_unavailable => ServiceUnavailable,
        /// Anything else; adapters redact the message.
        internal => InternalError,
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Whether the message may leak internals and must not reach clients.
    pub fn is_internal(&self) -> bool {
        self.code == ErrorCode::InternalError
    }

    /// Replace the captured trace id.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details such as `{"field": "semester"}`.
    ///
    /// # Examples
    /// ```
    /// use cgpa_portal::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "semester" }));
    /// assert_eq!(err.details(), Some(&json!({ "field": "semester" })));
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
