//! Faculty review handlers.
//!
//! ```text
//! GET  /api/v1/faculty/queue?status=pending
//! PUT  /api/v1/faculty/cgpa-requests/{id}/decision
//! POST /api/v1/faculty/cgpa-requests/bulk-decision
//! GET  /api/v1/faculty/stats
//! ```
//!
//! The acting faculty member is always the session user. Department and
//! role checks happen in the workflow service against fresh records.

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{BulkDecisionCommand, BulkDecisionEntry, DecisionCommand, FacultyStats};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::CgpaRequestResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_decision, parse_request_id, parse_status, require};

/// Optional status filter for the review queue.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QueueQuery {
    /// `pending` (default), `approved` or `rejected`.
    pub status: Option<String>,
}

/// Decision body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    #[schema(example = "approved")]
    pub action: Option<String>,
    #[schema(example = "Good work")]
    pub feedback: Option<String>,
}

/// Bulk decision body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDecisionRequest {
    pub request_ids: Option<Vec<String>>,
    pub action: Option<String>,
    pub feedback: Option<String>,
}

/// Outcome for one id of a bulk decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDecisionResult {
    pub request_id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<CgpaRequestResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
}

impl From<BulkDecisionEntry> for BulkDecisionResult {
    fn from(entry: BulkDecisionEntry) -> Self {
        let BulkDecisionEntry { request_id, result } = entry;
        match result {
            Ok(request) => Self {
                request_id,
                ok: true,
                request: Some(request.into()),
                error: None,
            },
            Err(error) => Self {
                request_id,
                ok: false,
                request: None,
                error: Some(error),
            },
        }
    }
}

/// Per-id results, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDecisionResponse {
    pub results: Vec<BulkDecisionResult>,
}

/// Department dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyStatsResponse {
    pub department: String,
    pub total_students: u64,
    pub pending_approvals: u64,
    pub approved_requests: u64,
    pub department_average_cgpa: f64,
}

impl From<FacultyStats> for FacultyStatsResponse {
    fn from(value: FacultyStats) -> Self {
        Self {
            department: value.department.into(),
            total_students: value.total_students,
            pending_approvals: value.pending_approvals,
            approved_requests: value.approved_requests,
            department_average_cgpa: value.department_average_cgpa,
        }
    }
}

/// Requests awaiting review in the caller's department.
#[utoipa::path(
    get,
    path = "/api/v1/faculty/queue",
    params(QueueQuery),
    responses(
        (status = 200, description = "Department queue, newest first", body = [CgpaRequestResponse]),
        (status = 400, description = "Unknown status filter", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Invalid faculty ID", body = Error)
    ),
    tags = ["faculty"],
    operation_id = "facultyQueue"
)]
#[get("/faculty/queue")]
pub async fn queue(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<QueueQuery>,
) -> ApiResult<web::Json<Vec<CgpaRequestResponse>>> {
    let faculty_id = session.require_user_id()?;
    let status = parse_status(query.status.as_deref())?;
    let views = state
        .requests_query
        .department_queue(&faculty_id, status)
        .await?;
    Ok(web::Json(
        views.into_iter().map(CgpaRequestResponse::from).collect(),
    ))
}

/// Approve or reject one request.
#[utoipa::path(
    put,
    path = "/api/v1/faculty/cgpa-requests/{id}/decision",
    params(("id" = String, Path, description = "Request id")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decided request", body = CgpaRequestResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Request belongs to another department", body = Error),
        (status = 404, description = "Request or faculty not found", body = Error),
        (status = 409, description = "Request already decided", body = Error)
    ),
    tags = ["faculty"],
    operation_id = "decideCgpaRequest"
)]
#[put("/faculty/cgpa-requests/{id}/decision")]
pub async fn decide(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DecisionRequest>,
) -> ApiResult<web::Json<CgpaRequestResponse>> {
    let faculty_id = session.require_user_id()?;
    let request_id = parse_request_id(&path.into_inner())?;
    let DecisionRequest { action, feedback } = payload.into_inner();
    let decision = parse_decision(&require(action, "action")?)?;
    let decided = state
        .requests
        .decide(DecisionCommand {
            request_id,
            decision,
            feedback,
            faculty_id,
        })
        .await?;
    Ok(web::Json(decided.into()))
}

/// Apply one decision to several requests; failures are reported per id.
#[utoipa::path(
    post,
    path = "/api/v1/faculty/cgpa-requests/bulk-decision",
    request_body = BulkDecisionRequest,
    responses(
        (status = 200, description = "Per-id results", body = BulkDecisionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Invalid faculty ID", body = Error)
    ),
    tags = ["faculty"],
    operation_id = "bulkDecideCgpaRequests"
)]
#[post("/faculty/cgpa-requests/bulk-decision")]
pub async fn bulk_decide(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BulkDecisionRequest>,
) -> ApiResult<web::Json<BulkDecisionResponse>> {
    let faculty_id = session.require_user_id()?;
    let BulkDecisionRequest {
        request_ids,
        action,
        feedback,
    } = payload.into_inner();
    let request_ids = require(request_ids, "requestIds")?;
    let decision = parse_decision(&require(action, "action")?)?;
    let entries = state
        .requests
        .bulk_decide(BulkDecisionCommand {
            request_ids,
            decision,
            feedback,
            faculty_id,
        })
        .await?;
    Ok(web::Json(BulkDecisionResponse {
        results: entries.into_iter().map(BulkDecisionResult::from).collect(),
    }))
}

/// Dashboard figures for the caller's department.
#[utoipa::path(
    get,
    path = "/api/v1/faculty/stats",
    responses(
        (status = 200, description = "Department figures", body = FacultyStatsResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Invalid faculty ID", body = Error)
    ),
    tags = ["faculty"],
    operation_id = "facultyStats"
)]
#[get("/faculty/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FacultyStatsResponse>> {
    let faculty_id = session.require_user_id()?;
    let figures = state.dashboard.faculty_stats(&faculty_id).await?;
    Ok(web::Json(figures.into()))
}
