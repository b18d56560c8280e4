//! Driving port for dashboard figures.

use async_trait::async_trait;

use crate::domain::{Department, Error, UserId};

/// Department-level figures for a faculty member.
#[derive(Debug, Clone, PartialEq)]
pub struct FacultyStats {
    pub department: Department,
    pub total_students: u64,
    pub pending_approvals: u64,
    /// Approvals issued by this faculty member.
    pub approved_requests: u64,
    /// Mean cgpa over the department's students; `0.0` when there are none.
    pub department_average_cgpa: f64,
}

/// Figures for a student's own dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentStats {
    pub name: String,
    pub cgpa: f64,
    /// `"N/A"` when the student has none on record.
    pub student_number: String,
    /// `"N/A"` when the student has none on record.
    pub department: String,
    pub pending_requests: u64,
    pub approved_requests: u64,
    pub rejected_requests: u64,
}

/// Read-only aggregation, recomputed on every call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    async fn faculty_stats(&self, faculty_id: &UserId) -> Result<FacultyStats, Error>;

    async fn student_stats(&self, student_id: &UserId) -> Result<StudentStats, Error>;
}
