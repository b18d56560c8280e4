//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions to and from
//! domain types live alongside them so each repository stays a thin
//! translator.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AcademicProfile, Cgpa, CgpaRequestId, CgpaUpdateRequest, Department, Email, PersonName,
    RequestStatus, Role, Semester, SupportingDocument, User, UserDraft, UserId,
};

use super::schema::{cgpa_requests, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department: Option<String>,
    pub student_number: Option<String>,
    pub cgpa: Option<f64>,
    pub faculty_id: Option<String>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "maintained by the database for auditing")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'a str,
    pub department: Option<&'a str>,
    pub student_number: Option<&'a str>,
    pub cgpa: Option<f64>,
    pub faculty_id: Option<&'a str>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            password_hash: user.password_hash(),
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
            role: user.role().as_str(),
            department: user.department().map(AsRef::as_ref),
            student_number: user.student_number(),
            cgpa: user.cgpa().map(Cgpa::value),
            faculty_id: user.faculty_id(),
            approved: user.is_approved_faculty(),
            created_at: user.created_at(),
            updated_at: user.created_at(),
        }
    }
}

/// Reason a stored row could not be turned back into a domain value.
pub(crate) type RowError = String;

impl TryFrom<UserRow> for User {
    type Error = RowError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|err| format!("user {}: {err}", row.id))?;
        let profile = match role {
            Role::Student => AcademicProfile::Student {
                student_number: row.student_number,
                cgpa: Cgpa::new(row.cgpa.unwrap_or_default())
                    .map_err(|err| format!("user {}: {err}", row.id))?,
            },
            Role::Faculty => AcademicProfile::Faculty {
                faculty_id: row
                    .faculty_id
                    .ok_or_else(|| format!("faculty {} has no faculty id", row.id))?,
                approved: row.approved,
            },
        };
        let invalid = |err: crate::domain::UserValidationError| format!("user {}: {err}", row.id);
        Self::try_from(UserDraft {
            id: UserId::from_uuid(row.id),
            email: Email::new(&row.email).map_err(invalid)?,
            password_hash: row.password_hash,
            first_name: PersonName::new(&row.first_name).map_err(invalid)?,
            last_name: PersonName::new(&row.last_name).map_err(invalid)?,
            department: row
                .department
                .as_deref()
                .map(Department::new)
                .transpose()
                .map_err(invalid)?,
            profile,
            created_at: row.created_at,
        })
        .map_err(invalid)
    }
}

/// Row struct for reading from the cgpa_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cgpa_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CgpaRequestRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_department: Option<String>,
    pub current_cgpa: f64,
    pub new_cgpa: f64,
    pub semester: String,
    pub status: String,
    pub documents: serde_json::Value,
    pub reviewed_by: Option<Uuid>,
    pub feedback: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cgpa_requests)]
pub(crate) struct NewCgpaRequestRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_department: Option<&'a str>,
    pub current_cgpa: f64,
    pub new_cgpa: f64,
    pub semester: &'a str,
    pub status: &'a str,
    pub documents: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewCgpaRequestRow<'a> {
    pub(crate) fn from_domain(request: &'a CgpaUpdateRequest) -> Result<Self, RowError> {
        Ok(Self {
            id: *request.id.as_uuid(),
            student_id: *request.student_id.as_uuid(),
            student_department: request.student_department.as_ref().map(AsRef::as_ref),
            current_cgpa: request.current_cgpa.value(),
            new_cgpa: request.new_cgpa.value(),
            semester: request.semester.as_ref(),
            status: request.status.as_str(),
            documents: serde_json::to_value(&request.documents)
                .map_err(|err| format!("encode documents: {err}"))?,
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
    }
}

/// Changeset written when a decision is recorded.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cgpa_requests)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DecisionChangeset<'a> {
    pub status: &'a str,
    pub student_department: Option<&'a str>,
    pub reviewed_by: Option<Uuid>,
    pub feedback: Option<&'a str>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a CgpaUpdateRequest> for DecisionChangeset<'a> {
    fn from(request: &'a CgpaUpdateRequest) -> Self {
        Self {
            status: request.status.as_str(),
            student_department: request.student_department.as_ref().map(AsRef::as_ref),
            reviewed_by: request.reviewed_by.map(|id| *id.as_uuid()),
            feedback: request.feedback.as_deref(),
            reviewed_at: request.reviewed_at,
            updated_at: request.updated_at,
        }
    }
}

impl TryFrom<CgpaRequestRow> for CgpaUpdateRequest {
    type Error = RowError;

    fn try_from(row: CgpaRequestRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let context = |err: &dyn std::fmt::Display| format!("cgpa request {id}: {err}");
        let documents: Vec<SupportingDocument> =
            serde_json::from_value(row.documents).map_err(|err| context(&err))?;
        Ok(Self {
            id: CgpaRequestId::from_uuid(row.id),
            student_id: UserId::from_uuid(row.student_id),
            student_department: row
                .student_department
                .as_deref()
                .map(Department::new)
                .transpose()
                .map_err(|err| context(&err))?,
            current_cgpa: Cgpa::new(row.current_cgpa).map_err(|err| context(&err))?,
            new_cgpa: Cgpa::new(row.new_cgpa).map_err(|err| context(&err))?,
            semester: Semester::new(&row.semester).map_err(|err| context(&err))?,
            status: row
                .status
                .parse::<RequestStatus>()
                .map_err(|err| context(&err))?,
            documents,
            reviewed_by: row.reviewed_by.map(UserId::from_uuid),
            feedback: row.feedback,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
