//! Port for CGPA update request persistence.
//!
//! Listing is predicate driven: callers describe what they want with a
//! [`RequestFilter`] and adapters translate it into their native query, so
//! department scoping happens inside the query rather than afterwards.
//!
//! Recording a decision is a single atomic operation covering the status
//! change and, for approvals, the write-back of the new cgpa onto the
//! student record.

use async_trait::async_trait;

use crate::domain::{CgpaRequestId, CgpaUpdateRequest, Department, RequestStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by request repository adapters.
    pub enum CgpaRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "cgpa request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "cgpa request repository query failed: {message}",
        /// The request to decide no longer exists.
        Missing { id: String } => "cgpa request {id} not found",
        /// The request was no longer in the expected state.
        StatusConflict { actual: RequestStatus } =>
            "cgpa request is already {actual}",
    }
}

/// Conjunctive predicate over stored requests. `None` fields match anything.
///
/// # Examples
/// ```
/// use cgpa_portal::domain::ports::RequestFilter;
/// use cgpa_portal::domain::{Department, RequestStatus};
///
/// let cs = Department::new("CS").expect("department");
/// let filter = RequestFilter::for_department(cs).with_status(RequestStatus::Pending);
/// assert_eq!(filter.status, Some(RequestStatus::Pending));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub student_id: Option<UserId>,
    pub department: Option<Department>,
    pub status: Option<RequestStatus>,
    pub reviewed_by: Option<UserId>,
}

impl RequestFilter {
    /// Requests snapshotted under `department`.
    #[must_use]
    pub fn for_department(department: Department) -> Self {
        Self {
            department: Some(department),
            ..Self::default()
        }
    }

    /// Requests authored by `student_id`.
    #[must_use]
    pub fn for_student(student_id: UserId) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }

    /// Requests decided by `reviewer`.
    #[must_use]
    pub fn for_reviewer(reviewer: UserId) -> Self {
        Self {
            reviewed_by: Some(reviewer),
            ..Self::default()
        }
    }

    /// Restrict the filter to one status.
    #[must_use]
    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Evaluate the predicate in memory.
    ///
    /// A request without a department snapshot never matches a department
    /// constraint.
    #[must_use]
    pub fn matches(&self, request: &CgpaUpdateRequest) -> bool {
        self.student_id
            .is_none_or(|id| request.student_id == id)
            && self
                .department
                .as_ref()
                .is_none_or(|dept| request.student_department.as_ref() == Some(dept))
            && self.status.is_none_or(|status| request.status == status)
            && self
                .reviewed_by
                .is_none_or(|reviewer| request.reviewed_by == Some(reviewer))
    }
}

/// How strictly a decision write checks the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionGuard {
    /// Only write if the stored request is still pending.
    RequirePending,
    /// Overwrite whatever is stored.
    Unguarded,
}

/// Result of an applied decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    /// The request as persisted.
    pub request: CgpaUpdateRequest,
    /// Whether the student's cgpa was overwritten. Always `false` for
    /// rejections, and `false` for approvals whose student no longer exists.
    pub cgpa_propagated: bool,
}

/// Port for storing and querying CGPA update requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CgpaRequestRepository: Send + Sync {
    /// Insert a newly submitted request.
    async fn create(&self, request: &CgpaUpdateRequest) -> Result<(), CgpaRequestRepositoryError>;

    /// Fetch a request by id.
    async fn find_by_id(
        &self,
        id: &CgpaRequestId,
    ) -> Result<Option<CgpaUpdateRequest>, CgpaRequestRepositoryError>;

    /// List requests matching `filter`, newest first.
    async fn list(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<CgpaUpdateRequest>, CgpaRequestRepositoryError>;

    /// Count requests matching `filter`.
    async fn count(&self, filter: &RequestFilter) -> Result<u64, CgpaRequestRepositoryError>;

    /// Persist a decided request and, when it is approved, overwrite the
    /// student's cgpa with `decided.new_cgpa`, all in one atomic unit.
    ///
    /// With [`TransitionGuard::RequirePending`] the write only happens if the
    /// stored status is still pending; otherwise
    /// [`CgpaRequestRepositoryError::StatusConflict`] reports the status found.
    async fn apply_decision(
        &self,
        decided: &CgpaUpdateRequest,
        guard: TransitionGuard,
    ) -> Result<DecisionOutcome, CgpaRequestRepositoryError>;
}
