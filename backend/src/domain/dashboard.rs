//! Dashboard figures for faculty and students.
//!
//! Every call recomputes its figures from the repositories.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cgpa_workflow::{map_request_error, map_user_error};
use crate::domain::ports::{
    CgpaRequestRepository, DashboardQuery, FacultyStats, RequestFilter, StudentStats,
    UserRepository,
};
use crate::domain::{Error, RequestStatus, Role, UserId};

const NOT_AVAILABLE: &str = "N/A";

/// Read-only aggregation service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<U, R> {
    users: Arc<U>,
    requests: Arc<R>,
}

impl<U, R> DashboardService<U, R> {
    /// Create a service over the user and request repositories.
    pub fn new(users: Arc<U>, requests: Arc<R>) -> Self {
        Self { users, requests }
    }
}

impl<U, R> DashboardService<U, R>
where
    U: UserRepository,
    R: CgpaRequestRepository,
{
    async fn count(&self, filter: RequestFilter) -> Result<u64, Error> {
        self.requests
            .count(&filter)
            .await
            .map_err(map_request_error)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "department sizes stay far below 2^52"
    )]
    let len = values.len() as f64;
    values.iter().sum::<f64>() / len
}

#[async_trait]
impl<U, R> DashboardQuery for DashboardService<U, R>
where
    U: UserRepository,
    R: CgpaRequestRepository,
{
    async fn faculty_stats(&self, faculty_id: &UserId) -> Result<FacultyStats, Error> {
        let department = self
            .users
            .find_by_id(faculty_id)
            .await
            .map_err(map_user_error)?
            .and_then(|user| user.faculty_department().cloned())
            .ok_or_else(|| Error::invalid_faculty("Invalid faculty ID"))?;

        let students = self
            .users
            .list_students_in_department(&department)
            .await
            .map_err(map_user_error)?;
        let cgpas: Vec<f64> = students
            .iter()
            .filter_map(|student| student.cgpa())
            .map(|cgpa| cgpa.value())
            .collect();
        let total_students = u64::try_from(students.len())
            .map_err(|_| Error::internal("student count exceeds supported range"))?;

        let pending_approvals = self
            .count(
                RequestFilter::for_department(department.clone())
                    .with_status(RequestStatus::Pending),
            )
            .await?;
        let approved_requests = self
            .count(RequestFilter::for_reviewer(*faculty_id).with_status(RequestStatus::Approved))
            .await?;

        Ok(FacultyStats {
            department,
            total_students,
            pending_approvals,
            approved_requests,
            department_average_cgpa: mean(&cgpas),
        })
    }

    async fn student_stats(&self, student_id: &UserId) -> Result<StudentStats, Error> {
        let student = self
            .users
            .find_by_id(student_id)
            .await
            .map_err(map_user_error)?
            .filter(|user| user.role() == Role::Student)
            .ok_or_else(|| Error::not_found("Student not found"))?;

        let by_status =
            |status| RequestFilter::for_student(*student_id).with_status(status);
        let pending_requests = self.count(by_status(RequestStatus::Pending)).await?;
        let approved_requests = self.count(by_status(RequestStatus::Approved)).await?;
        let rejected_requests = self.count(by_status(RequestStatus::Rejected)).await?;

        Ok(StudentStats {
            name: student.full_name(),
            cgpa: student.cgpa().map_or(0.0, |cgpa| cgpa.value()),
            student_number: student
                .student_number()
                .unwrap_or(NOT_AVAILABLE)
                .to_owned(),
            department: student
                .department()
                .map_or_else(|| NOT_AVAILABLE.to_owned(), ToString::to_string),
            pending_requests,
            approved_requests,
            rejected_requests,
        })
    }
}
