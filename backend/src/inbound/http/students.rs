//! Student dashboard handler.
//!
//! ```text
//! GET /api/v1/students/me/stats
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::StudentStats;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Figures shown on a student's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatsResponse {
    pub name: String,
    pub cgpa: f64,
    /// Student number, or `"N/A"`.
    pub student_id: String,
    /// Department, or `"N/A"`.
    pub department: String,
    pub pending_requests: u64,
    pub approved_requests: u64,
    pub rejected_requests: u64,
}

impl From<StudentStats> for StudentStatsResponse {
    fn from(stats: StudentStats) -> Self {
        Self {
            name: stats.name,
            cgpa: stats.cgpa,
            student_id: stats.student_number,
            department: stats.department,
            pending_requests: stats.pending_requests,
            approved_requests: stats.approved_requests,
            rejected_requests: stats.rejected_requests,
        }
    }
}

/// Dashboard figures for the signed-in student.
#[utoipa::path(
    get,
    path = "/api/v1/students/me/stats",
    responses(
        (status = 200, description = "Student figures", body = StudentStatsResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Student not found", body = Error)
    ),
    tags = ["students"],
    operation_id = "studentStats"
)]
#[get("/students/me/stats")]
pub async fn my_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StudentStatsResponse>> {
    let student_id = session.require_user_id()?;
    let stats = state.dashboard.student_stats(&student_id).await?;
    Ok(web::Json(stats.into()))
}
