//! Student-facing request handlers.
//!
//! ```text
//! POST /api/v1/cgpa-requests
//! GET  /api/v1/cgpa-requests/mine
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CgpaSubmission, Error, SupportingDocument};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CgpaRequestResponse, DocumentDto};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{CgpaInput, require};

/// Submission body. `newCgpa` may be a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCgpaRequest {
    #[schema(value_type = Option<f64>, example = 8.8)]
    pub new_cgpa: Option<CgpaInput>,
    #[schema(example = "Fall 2025")]
    pub semester: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentDto>,
}

impl TryFrom<SubmitCgpaRequest> for CgpaSubmission {
    type Error = Error;

    fn try_from(value: SubmitCgpaRequest) -> Result<Self, Self::Error> {
        let new_cgpa = require(value.new_cgpa, "newCgpa")?.to_f64("newCgpa")?;
        Ok(Self {
            new_cgpa,
            semester: require(value.semester, "semester")?,
            documents: value
                .documents
                .into_iter()
                .map(SupportingDocument::from)
                .collect(),
        })
    }
}

/// Submit a cgpa update for review by the student's department.
#[utoipa::path(
    post,
    path = "/api/v1/cgpa-requests",
    request_body = SubmitCgpaRequest,
    responses(
        (status = 201, description = "Request submitted", body = CgpaRequestResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Only students may submit", body = Error),
        (status = 404, description = "Student not found", body = Error)
    ),
    tags = ["cgpa-requests"],
    operation_id = "submitCgpaRequest"
)]
#[post("/cgpa-requests")]
pub async fn submit_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitCgpaRequest>,
) -> ApiResult<HttpResponse> {
    let student_id = session.require_user_id()?;
    let submission = CgpaSubmission::try_from(payload.into_inner())?;
    let created = state.requests.submit(&student_id, submission).await?;
    Ok(HttpResponse::Created().json(CgpaRequestResponse::from(created)))
}

/// The signed-in student's requests, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/cgpa-requests/mine",
    responses(
        (status = 200, description = "Request history", body = [CgpaRequestResponse]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Only students have a history", body = Error)
    ),
    tags = ["cgpa-requests"],
    operation_id = "listMyCgpaRequests"
)]
#[get("/cgpa-requests/mine")]
pub async fn my_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CgpaRequestResponse>>> {
    let student_id = session.require_user_id()?;
    let views = state.requests_query.student_requests(&student_id).await?;
    Ok(web::Json(
        views.into_iter().map(CgpaRequestResponse::from).collect(),
    ))
}
