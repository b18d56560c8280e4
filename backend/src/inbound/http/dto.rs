//! JSON shapes shared by several handlers.
//!
//! Domain types stay free of wire concerns; these structs own the camelCase
//! field names and the OpenAPI schemas.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RequestView, UserSummary};
use crate::domain::{AcademicProfile, CgpaUpdateRequest, SupportingDocument, User};

/// Profile of a portal user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "student")]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Student number; students only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let (student_id, cgpa, faculty_id, approved) = match user.profile() {
            AcademicProfile::Student {
                student_number,
                cgpa,
            } => (student_number.clone(), Some(cgpa.value()), None, None),
            AcademicProfile::Faculty {
                faculty_id,
                approved,
            } => (None, None, Some(faculty_id.clone()), Some(*approved)),
        };
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().as_ref().to_owned(),
            last_name: user.last_name().as_ref().to_owned(),
            role: user.role().to_string(),
            department: user.department().map(ToString::to_string),
            student_id,
            cgpa,
            faculty_id,
            approved,
        }
    }
}

/// Display fields of a student or reviewer attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            first_name: summary.first_name,
            last_name: summary.last_name,
            email: summary.email.into(),
            department: summary.department.map(String::from),
            student_id: summary.student_number,
        }
    }
}

/// Supporting document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub name: String,
    pub url: String,
}

impl From<DocumentDto> for SupportingDocument {
    fn from(value: DocumentDto) -> Self {
        Self {
            name: value.name,
            url: value.url,
        }
    }
}

impl From<SupportingDocument> for DocumentDto {
    fn from(value: SupportingDocument) -> Self {
        Self {
            name: value.name,
            url: value.url,
        }
    }
}

/// A cgpa update request as clients see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CgpaRequestResponse {
    pub id: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_department: Option<String>,
    pub current_cgpa: f64,
    pub new_cgpa: f64,
    #[schema(example = "Fall 2025")]
    pub semester: String,
    #[schema(example = "pending")]
    pub status: String,
    pub documents: Vec<DocumentDto>,
    /// Id of the deciding faculty member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<UserSummaryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<UserSummaryResponse>,
}

impl From<CgpaUpdateRequest> for CgpaRequestResponse {
    fn from(request: CgpaUpdateRequest) -> Self {
        Self {
            id: request.id.to_string(),
            student_id: request.student_id.to_string(),
            student_department: request.student_department.map(String::from),
            current_cgpa: request.current_cgpa.value(),
            new_cgpa: request.new_cgpa.value(),
            semester: request.semester.into(),
            status: request.status.to_string(),
            documents: request.documents.into_iter().map(DocumentDto::from).collect(),
            approved_by: request.reviewed_by.map(|id| id.to_string()),
            feedback: request.feedback,
            reviewed_at: request.reviewed_at.map(|at| at.to_rfc3339()),
            created_at: request.created_at.to_rfc3339(),
            updated_at: request.updated_at.to_rfc3339(),
            student: None,
            reviewer: None,
        }
    }
}

impl From<RequestView> for CgpaRequestResponse {
    fn from(view: RequestView) -> Self {
        Self {
            student: view.student.map(UserSummaryResponse::from),
            reviewer: view.reviewer.map(UserSummaryResponse::from),
            ..Self::from(view.request)
        }
    }
}
