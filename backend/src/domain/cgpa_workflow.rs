//! CGPA update approval workflow.
//!
//! [`CgpaWorkflowService`] implements both workflow driving ports. Every
//! privileged step re-reads the acting user from the [`UserRepository`], so
//! roles and departments are never taken from caller input.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    BulkDecisionCommand, BulkDecisionEntry, CgpaRequestCommand, CgpaRequestQuery,
    CgpaRequestRepository, CgpaRequestRepositoryError, DecisionCommand, DecisionMetrics,
    DecisionOutcome, DecisionOutcomeKind, NoOpDecisionMetrics, RequestFilter, RequestView,
    TransitionGuard, UserRepository, UserRepositoryError, UserSummary,
};
use crate::domain::{
    CgpaRequestId, CgpaRequestValidationError, CgpaSubmission, CgpaUpdateRequest, Decision,
    Department, Error, ErrorCode, NewCgpaRequest, RequestStatus, Role, User, UserId,
};

/// Switches that alter the decision rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowPolicy {
    /// Let a decided request be decided again, overwriting the first
    /// decision.
    pub allow_redecision: bool,
    /// Refuse decisions from faculty whose account is not yet approved.
    pub require_faculty_approval: bool,
}

impl WorkflowPolicy {
    const fn guard(self) -> TransitionGuard {
        if self.allow_redecision {
            TransitionGuard::Unguarded
        } else {
            TransitionGuard::RequirePending
        }
    }
}

/// Workflow service implementing [`CgpaRequestCommand`] and
/// [`CgpaRequestQuery`].
#[derive(Clone)]
pub struct CgpaWorkflowService<U, R> {
    users: Arc<U>,
    requests: Arc<R>,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn DecisionMetrics>,
    policy: WorkflowPolicy,
}

impl<U, R> CgpaWorkflowService<U, R> {
    /// Create a service with the default policy and no metrics.
    pub fn new(users: Arc<U>, requests: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            requests,
            clock,
            metrics: Arc::new(NoOpDecisionMetrics),
            policy: WorkflowPolicy::default(),
        }
    }

    /// Replace the decision metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn DecisionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the workflow policy.
    #[must_use]
    pub fn with_policy(mut self, policy: WorkflowPolicy) -> Self {
        self.policy = policy;
        self
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { .. }
        | UserRepositoryError::DuplicateFacultyId { .. } => {
            Error::conflict("User already exists")
        }
    }
}

pub(crate) fn map_request_error(error: CgpaRequestRepositoryError) -> Error {
    match error {
        CgpaRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("cgpa request repository unavailable: {message}"))
        }
        CgpaRequestRepositoryError::Query { message } => {
            Error::internal(format!("cgpa request repository error: {message}"))
        }
        CgpaRequestRepositoryError::Missing { .. } => Error::not_found("Request not found"),
        CgpaRequestRepositoryError::StatusConflict { actual } => {
            Error::conflict(format!("Request has already been {actual}")).with_details(json!({
                "field": "status",
                "code": "already_decided",
                "value": actual.as_str(),
            }))
        }
    }
}

fn validation_error(error: CgpaRequestValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

fn outcome_kind(error: &Error) -> DecisionOutcomeKind {
    match error.code() {
        ErrorCode::Conflict => DecisionOutcomeKind::Conflict,
        _ => DecisionOutcomeKind::Failed,
    }
}

impl<U, R> CgpaWorkflowService<U, R>
where
    U: UserRepository,
    R: CgpaRequestRepository,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }

    /// Resolve a faculty member and their department, or `InvalidFaculty`.
    async fn resolve_faculty(&self, faculty_id: &UserId) -> Result<(User, Department), Error> {
        self.find_user(faculty_id)
            .await?
            .and_then(|user| {
                let department = user.faculty_department().cloned()?;
                Some((user, department))
            })
            .ok_or_else(|| Error::invalid_faculty("Invalid faculty ID"))
    }

    /// Resolve the deciding faculty member, applying the approval gate.
    async fn resolve_decider(&self, faculty_id: &UserId) -> Result<Department, Error> {
        let (faculty, department) = self.resolve_faculty(faculty_id).await?;
        if self.policy.require_faculty_approval && !faculty.is_approved_faculty() {
            return Err(Error::forbidden("Faculty account is awaiting approval"));
        }
        Ok(department)
    }

    async fn apply(
        &self,
        request_id: &CgpaRequestId,
        decision: Decision,
        feedback: Option<&str>,
        faculty_id: UserId,
        department: &Department,
    ) -> Result<DecisionOutcome, Error> {
        let stored = self
            .requests
            .find_by_id(request_id)
            .await
            .map_err(map_request_error)?
            .ok_or_else(|| Error::not_found("Request not found"))?;
        if &stored.department_or_general() != department {
            return Err(Error::forbidden(
                "Request belongs to a different department",
            ));
        }

        let decided = stored.decided(decision, feedback, faculty_id, self.clock.utc());
        self.requests
            .apply_decision(&decided, self.policy.guard())
            .await
            .map_err(map_request_error)
    }

    async fn decide_one(
        &self,
        request_id: &CgpaRequestId,
        decision: Decision,
        feedback: Option<&str>,
        faculty_id: UserId,
        department: &Department,
    ) -> Result<CgpaUpdateRequest, Error> {
        let outcome = match self
            .apply(request_id, decision, feedback, faculty_id, department)
            .await
        {
            Ok(outcome) => outcome,
            Err(error) => {
                self.record(decision, outcome_kind(&error)).await;
                return Err(error);
            }
        };

        let skipped = decision == Decision::Approved && !outcome.cgpa_propagated;
        if skipped {
            warn!(
                request_id = %request_id,
                student_id = %outcome.request.student_id,
                "approved request's student no longer exists; cgpa not propagated"
            );
        }
        info!(
            request_id = %request_id,
            faculty_id = %faculty_id,
            decision = decision.as_str(),
            cgpa_propagated = outcome.cgpa_propagated,
            "cgpa request decided"
        );
        let kind = if skipped {
            DecisionOutcomeKind::PropagationSkipped
        } else {
            DecisionOutcomeKind::Applied
        };
        self.record(decision, kind).await;
        Ok(outcome.request)
    }

    async fn record(&self, decision: Decision, kind: DecisionOutcomeKind) {
        if let Err(error) = self.metrics.record_decision(decision, kind).await {
            warn!(%error, "failed to record decision metrics");
        }
    }

    async fn enrich(&self, requests: Vec<CgpaUpdateRequest>) -> Result<Vec<RequestView>, Error> {
        let mut ids: Vec<UserId> = requests
            .iter()
            .flat_map(|request| std::iter::once(request.student_id).chain(request.reviewed_by))
            .collect();
        ids.sort_unstable_by_key(|id| *id.as_uuid());
        ids.dedup();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let people: HashMap<UserId, UserSummary> = self
            .users
            .find_many(&ids)
            .await
            .map_err(map_user_error)?
            .iter()
            .map(|user| (*user.id(), UserSummary::from(user)))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| RequestView {
                student: people.get(&request.student_id).cloned(),
                reviewer: request
                    .reviewed_by
                    .and_then(|reviewer| people.get(&reviewer).cloned()),
                request,
            })
            .collect())
    }
}

#[async_trait]
impl<U, R> CgpaRequestCommand for CgpaWorkflowService<U, R>
where
    U: UserRepository,
    R: CgpaRequestRepository,
{
    async fn submit(
        &self,
        student_id: &UserId,
        submission: CgpaSubmission,
    ) -> Result<CgpaUpdateRequest, Error> {
        let input = NewCgpaRequest::try_from(submission).map_err(validation_error)?;
        let student = self
            .find_user(student_id)
            .await?
            .ok_or_else(|| Error::not_found("Student not found"))?;
        if student.role() != Role::Student {
            return Err(Error::forbidden("Only students can submit cgpa updates"));
        }

        let request = CgpaUpdateRequest::submit(&student, input, self.clock.utc());
        self.requests
            .create(&request)
            .await
            .map_err(map_request_error)?;
        info!(
            request_id = %request.id,
            student_id = %student_id,
            "cgpa update request submitted"
        );
        Ok(request)
    }

    async fn decide(&self, command: DecisionCommand) -> Result<CgpaUpdateRequest, Error> {
        let DecisionCommand {
            request_id,
            decision,
            feedback,
            faculty_id,
        } = command;
        let department = match self.resolve_decider(&faculty_id).await {
            Ok(department) => department,
            Err(error) => {
                self.record(decision, outcome_kind(&error)).await;
                return Err(error);
            }
        };
        self.decide_one(
            &request_id,
            decision,
            feedback.as_deref(),
            faculty_id,
            &department,
        )
        .await
    }

    async fn bulk_decide(
        &self,
        command: BulkDecisionCommand,
    ) -> Result<Vec<BulkDecisionEntry>, Error> {
        let BulkDecisionCommand {
            request_ids,
            decision,
            feedback,
            faculty_id,
        } = command;
        if request_ids.is_empty() {
            return Err(Error::invalid_request("requestIds must not be empty").with_details(
                json!({ "field": "requestIds", "code": "empty" }),
            ));
        }
        let department = self.resolve_decider(&faculty_id).await?;

        let mut entries = Vec::with_capacity(request_ids.len());
        for raw in request_ids {
            let result = match CgpaRequestId::new(&raw) {
                Ok(id) => {
                    self.decide_one(&id, decision, feedback.as_deref(), faculty_id, &department)
                        .await
                }
                Err(error) => Err(validation_error(error)),
            };
            entries.push(BulkDecisionEntry {
                request_id: raw,
                result,
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl<U, R> CgpaRequestQuery for CgpaWorkflowService<U, R>
where
    U: UserRepository,
    R: CgpaRequestRepository,
{
    async fn department_queue(
        &self,
        faculty_id: &UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<RequestView>, Error> {
        let (_, department) = self.resolve_faculty(faculty_id).await?;
        let filter =
            RequestFilter::for_department(department).with_status(status.unwrap_or_default());
        let requests = self
            .requests
            .list(&filter)
            .await
            .map_err(map_request_error)?;
        self.enrich(requests).await
    }

    async fn student_requests(&self, student_id: &UserId) -> Result<Vec<RequestView>, Error> {
        let student = self
            .find_user(student_id)
            .await?
            .ok_or_else(|| Error::not_found("Student not found"))?;
        if student.role() != Role::Student {
            return Err(Error::forbidden("Only students have cgpa requests"));
        }
        let requests = self
            .requests
            .list(&RequestFilter::for_student(*student_id))
            .await
            .map_err(map_request_error)?;
        self.enrich(requests).await
    }
}

#[cfg(test)]
mod tests;
