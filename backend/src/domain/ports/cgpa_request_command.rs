//! Driving port for state-changing workflow operations.

use async_trait::async_trait;

use crate::domain::{CgpaRequestId, CgpaSubmission, CgpaUpdateRequest, Decision, Error, UserId};

/// A single decision issued by a faculty member.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionCommand {
    pub request_id: CgpaRequestId,
    pub decision: Decision,
    pub feedback: Option<String>,
    pub faculty_id: UserId,
}

/// One decision applied to many requests.
///
/// Ids stay raw so a malformed entry fails on its own instead of rejecting
/// the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDecisionCommand {
    pub request_ids: Vec<String>,
    pub decision: Decision,
    pub feedback: Option<String>,
    pub faculty_id: UserId,
}

/// Per-id result of a bulk decision.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDecisionEntry {
    pub request_id: String,
    pub result: Result<CgpaUpdateRequest, Error>,
}

/// Workflow commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CgpaRequestCommand: Send + Sync {
    /// Submit a new pending request on behalf of `student_id`.
    async fn submit(
        &self,
        student_id: &UserId,
        submission: CgpaSubmission,
    ) -> Result<CgpaUpdateRequest, Error>;

    /// Record a decision and propagate an approved cgpa.
    async fn decide(&self, command: DecisionCommand) -> Result<CgpaUpdateRequest, Error>;

    /// Apply one decision to each id independently, without rollback.
    ///
    /// Only a failure to resolve the faculty member fails the whole call.
    async fn bulk_decide(
        &self,
        command: BulkDecisionCommand,
    ) -> Result<Vec<BulkDecisionEntry>, Error>;
}
