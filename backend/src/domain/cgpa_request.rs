//! CGPA update requests and their decision lifecycle.
//!
//! A request snapshots the student's cgpa and department when it is
//! submitted. The department copy lets faculty queues filter without a join;
//! it goes stale if the student later changes department, and that is
//! accepted.
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject────▶ rejected
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Cgpa, Department, User, UserId};

/// Maximum length of a semester label.
pub const SEMESTER_MAX: usize = 64;

/// Validation errors raised while building a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CgpaRequestValidationError {
    /// Request id is not a UUID.
    InvalidId,
    /// Requested cgpa is outside `[0, 10]` or not finite.
    CgpaOutOfRange,
    /// Semester label is blank after trimming.
    EmptySemester,
    /// Semester label exceeds [`SEMESTER_MAX`] characters.
    SemesterTooLong { max: usize },
    /// Document at `index` has no name.
    EmptyDocumentName { index: usize },
    /// Document at `index` has no url.
    EmptyDocumentUrl { index: usize },
    /// Decision action other than `approved` or `rejected`.
    UnknownDecision(String),
    /// Status filter that names no known status.
    UnknownStatus(String),
}

impl CgpaRequestValidationError {
    /// Wire-level field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "requestId",
            Self::CgpaOutOfRange => "newCgpa",
            Self::EmptySemester | Self::SemesterTooLong { .. } => "semester",
            Self::EmptyDocumentName { .. } | Self::EmptyDocumentUrl { .. } => "documents",
            Self::UnknownDecision(_) => "action",
            Self::UnknownStatus(_) => "status",
        }
    }

    /// Stable machine-readable code for error details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::CgpaOutOfRange => "out_of_range",
            Self::EmptySemester | Self::EmptyDocumentName { .. } | Self::EmptyDocumentUrl { .. } => {
                "empty_value"
            }
            Self::SemesterTooLong { .. } => "too_long",
            Self::UnknownDecision(_) | Self::UnknownStatus(_) => "unknown_value",
        }
    }
}

impl fmt::Display for CgpaRequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "request id must be a valid UUID"),
            Self::CgpaOutOfRange => write!(f, "newCgpa must be a number between 0 and 10"),
            Self::EmptySemester => write!(f, "semester must not be empty"),
            Self::SemesterTooLong { max } => {
                write!(f, "semester must be at most {max} characters")
            }
            Self::EmptyDocumentName { index } => {
                write!(f, "document {index} must have a name")
            }
            Self::EmptyDocumentUrl { index } => write!(f, "document {index} must have a url"),
            Self::UnknownDecision(value) => {
                write!(f, "action must be 'approved' or 'rejected', got '{value}'")
            }
            Self::UnknownStatus(value) => write!(
                f,
                "status must be 'pending', 'approved' or 'rejected', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for CgpaRequestValidationError {}

/// Identifier of a CGPA update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CgpaRequestId(Uuid);

impl CgpaRequestId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CgpaRequestValidationError> {
        Uuid::parse_str(raw.as_ref().trim())
            .map(Self)
            .map_err(|_| CgpaRequestValidationError::InvalidId)
    }

    /// Generate a fresh v4 identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier loaded from storage.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CgpaRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Lower-case wire and storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a decision has been recorded.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CgpaRequestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CgpaRequestValidationError::UnknownStatus(s.to_owned())),
        }
    }
}

/// Terminal outcome chosen by a faculty reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Status a request takes once this decision is applied.
    #[must_use]
    pub const fn status(self) -> RequestStatus {
        match self {
            Self::Approved => RequestStatus::Approved,
            Self::Rejected => RequestStatus::Rejected,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.status().as_str()
    }
}

impl FromStr for Decision {
    type Err = CgpaRequestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CgpaRequestValidationError::UnknownDecision(s.to_owned())),
        }
    }
}

/// Free-text academic term label, e.g. `"Fall 2025"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Semester(String);

impl Semester {
    /// Trim and validate a semester label.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CgpaRequestValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CgpaRequestValidationError::EmptySemester);
        }
        if trimmed.chars().count() > SEMESTER_MAX {
            return Err(CgpaRequestValidationError::SemesterTooLong { max: SEMESTER_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Semester {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Semester> for String {
    fn from(value: Semester) -> Self {
        value.0
    }
}

impl TryFrom<String> for Semester {
    type Error = CgpaRequestValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque reference to an uploaded supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportingDocument {
    pub name: String,
    pub url: String,
}

/// Raw student input for a new request.
#[derive(Debug, Clone, PartialEq)]
pub struct CgpaSubmission {
    pub new_cgpa: f64,
    pub semester: String,
    pub documents: Vec<SupportingDocument>,
}

/// Validated submission ready to be snapshotted against a student.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCgpaRequest {
    pub new_cgpa: Cgpa,
    pub semester: Semester,
    pub documents: Vec<SupportingDocument>,
}

impl TryFrom<CgpaSubmission> for NewCgpaRequest {
    type Error = CgpaRequestValidationError;

    fn try_from(value: CgpaSubmission) -> Result<Self, Self::Error> {
        let CgpaSubmission {
            new_cgpa,
            semester,
            documents,
        } = value;
        let new_cgpa =
            Cgpa::new(new_cgpa).map_err(|_| CgpaRequestValidationError::CgpaOutOfRange)?;
        let semester = Semester::new(semester)?;
        let documents = documents
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                let name = doc.name.trim();
                let url = doc.url.trim();
                if name.is_empty() {
                    return Err(CgpaRequestValidationError::EmptyDocumentName { index });
                }
                if url.is_empty() {
                    return Err(CgpaRequestValidationError::EmptyDocumentUrl { index });
                }
                Ok(SupportingDocument {
                    name: name.to_owned(),
                    url: url.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            new_cgpa,
            semester,
            documents,
        })
    }
}

/// A single proposed change to a student's cgpa.
///
/// `student_department` is `None` only for legacy rows written before the
/// snapshot existed; deciding such a request backfills it to `"General"`.
#[derive(Debug, Clone, PartialEq)]
pub struct CgpaUpdateRequest {
    pub id: CgpaRequestId,
    pub student_id: UserId,
    pub student_department: Option<Department>,
    pub current_cgpa: Cgpa,
    pub new_cgpa: Cgpa,
    pub semester: Semester,
    pub status: RequestStatus,
    pub documents: Vec<SupportingDocument>,
    pub reviewed_by: Option<UserId>,
    pub feedback: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CgpaUpdateRequest {
    /// Create a pending request, snapshotting the student's current cgpa and
    /// department at `now`.
    #[must_use]
    pub fn submit(student: &User, input: NewCgpaRequest, now: DateTime<Utc>) -> Self {
        let NewCgpaRequest {
            new_cgpa,
            semester,
            documents,
        } = input;
        Self {
            id: CgpaRequestId::random(),
            student_id: *student.id(),
            student_department: Some(
                student
                    .department()
                    .cloned()
                    .unwrap_or_else(Department::general),
            ),
            current_cgpa: student.cgpa().unwrap_or(Cgpa::ZERO),
            new_cgpa,
            semester,
            status: RequestStatus::Pending,
            documents,
            reviewed_by: None,
            feedback: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Department used for scoping; legacy rows fall back to `"General"`.
    #[must_use]
    pub fn department_or_general(&self) -> Department {
        self.student_department
            .clone()
            .unwrap_or_else(Department::general)
    }

    /// Return the request as it looks after `reviewer` records `decision`.
    ///
    /// Blank feedback is dropped. The status guard lives in the repository so
    /// that the check and the write happen atomically.
    #[must_use]
    pub fn decided(
        &self,
        decision: Decision,
        feedback: Option<&str>,
        reviewer: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        let feedback = feedback
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        Self {
            status: decision.status(),
            feedback,
            reviewed_by: Some(reviewer),
            reviewed_at: Some(now),
            student_department: Some(self.department_or_general()),
            updated_at: now,
            ..self.clone()
        }
    }
}
