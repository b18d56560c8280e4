//! Tests for the CGPA workflow service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{DecisionMetricsError, MockCgpaRequestRepository, MockUserRepository};
use crate::domain::test_support::{faculty, fixed_now, fixture_clock, student};
use crate::domain::{Cgpa, ErrorCode, SupportingDocument};

#[derive(Default)]
struct RecordingMetrics {
    calls: Mutex<Vec<(Decision, DecisionOutcomeKind)>>,
}

impl RecordingMetrics {
    fn calls(&self) -> Vec<(Decision, DecisionOutcomeKind)> {
        self.calls.lock().expect("metrics lock").clone()
    }
}

#[async_trait]
impl DecisionMetrics for RecordingMetrics {
    async fn record_decision(
        &self,
        decision: Decision,
        outcome: DecisionOutcomeKind,
    ) -> Result<(), DecisionMetricsError> {
        self.calls
            .lock()
            .expect("metrics lock")
            .push((decision, outcome));
        Ok(())
    }
}

type Service = CgpaWorkflowService<MockUserRepository, MockCgpaRequestRepository>;

fn make_service(users: MockUserRepository, requests: MockCgpaRequestRepository) -> Service {
    CgpaWorkflowService::new(Arc::new(users), Arc::new(requests), fixture_clock())
}

fn users_returning(known: Vec<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    let lookup = known.clone();
    users
        .expect_find_by_id()
        .returning(move |id| Ok(lookup.iter().find(|user| user.id() == id).cloned()));
    users.expect_find_many().returning(move |ids| {
        Ok(known
            .iter()
            .filter(|user| ids.contains(user.id()))
            .cloned()
            .collect())
    });
    users
}

fn submission(new_cgpa: f64) -> CgpaSubmission {
    CgpaSubmission {
        new_cgpa,
        semester: "Fall 2025".to_owned(),
        documents: vec![SupportingDocument {
            name: "transcript.pdf".to_owned(),
            url: "https://files.example.edu/t.pdf".to_owned(),
        }],
    }
}

fn pending_for(owner: &User) -> CgpaUpdateRequest {
    let input = NewCgpaRequest::try_from(submission(8.8)).expect("valid submission");
    CgpaUpdateRequest::submit(owner, input, fixed_now())
}

fn applied(decided: &CgpaUpdateRequest, propagated: bool) -> DecisionOutcome {
    DecisionOutcome {
        request: decided.clone(),
        cgpa_propagated: propagated,
    }
}

#[fixture]
fn sam() -> User {
    student("Sam", Some("CS"), 7.5)
}

#[fixture]
fn fran() -> User {
    faculty("Fran", "CS", true)
}

#[rstest]
#[tokio::test]
async fn submit_snapshots_student_state(sam: User) {
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_create().times(1).return_once(|_| Ok(()));
    let service = make_service(users_returning(vec![sam.clone()]), requests);

    let request = service
        .submit(sam.id(), submission(8.8))
        .await
        .expect("submission succeeds");

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.current_cgpa, Cgpa::new(7.5).expect("cgpa"));
    assert_eq!(request.new_cgpa, Cgpa::new(8.8).expect("cgpa"));
    assert_eq!(
        request.student_department.as_ref().map(AsRef::as_ref),
        Some("CS")
    );
    assert_eq!(request.created_at, fixed_now());
}

#[rstest]
#[case(10.5)]
#[case(-0.1)]
#[case(f64::NAN)]
#[tokio::test]
async fn submit_rejects_out_of_range_before_persisting(#[case] value: f64, sam: User) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_create().never();
    let service = make_service(users, requests);

    let error = service
        .submit(sam.id(), submission(value))
        .await
        .expect_err("out of range");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details present");
    assert_eq!(details["field"], "newCgpa");
}

#[tokio::test]
async fn submit_reports_unknown_student() {
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_create().never();
    let service = make_service(users_returning(Vec::new()), requests);

    let error = service
        .submit(&UserId::random(), submission(8.0))
        .await
        .expect_err("missing student");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Student not found");
}

#[rstest]
#[tokio::test]
async fn submit_refuses_faculty(fran: User) {
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_create().never();
    let service = make_service(users_returning(vec![fran.clone()]), requests);

    let error = service
        .submit(fran.id(), submission(8.0))
        .await
        .expect_err("faculty cannot submit");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn submit_maps_connection_failures(sam: User) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(|_| Err(UserRepositoryError::connection("pool exhausted")));
    let service = make_service(users, MockCgpaRequestRepository::new());

    let error = service
        .submit(sam.id(), submission(8.0))
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn decide_approves_with_pending_guard(sam: User, fran: User) {
    let pending = pending_for(&sam);
    let request_id = pending.id;
    let reviewer = *fran.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pending)));
    requests
        .expect_apply_decision()
        .withf(|_, guard| *guard == TransitionGuard::RequirePending)
        .times(1)
        .returning(|decided, _| Ok(applied(decided, true)));
    let metrics = Arc::new(RecordingMetrics::default());
    let service = make_service(users_returning(vec![sam, fran]), requests)
        .with_metrics(metrics.clone());

    let decided = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Approved,
            feedback: Some("  Good work ".to_owned()),
            faculty_id: reviewer,
        })
        .await
        .expect("decision succeeds");

    assert_eq!(decided.status, RequestStatus::Approved);
    assert_eq!(decided.reviewed_by, Some(reviewer));
    assert_eq!(decided.feedback.as_deref(), Some("Good work"));
    assert_eq!(decided.reviewed_at, Some(fixed_now()));
    assert_eq!(
        metrics.calls(),
        vec![(Decision::Approved, DecisionOutcomeKind::Applied)]
    );
}

#[rstest]
#[tokio::test]
async fn decide_uses_unguarded_write_when_redecision_allowed(sam: User, fran: User) {
    let mut decided_once = pending_for(&sam);
    decided_once.status = RequestStatus::Rejected;
    let request_id = decided_once.id;
    let reviewer = *fran.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(decided_once)));
    requests
        .expect_apply_decision()
        .withf(|_, guard| *guard == TransitionGuard::Unguarded)
        .times(1)
        .returning(|decided, _| Ok(applied(decided, true)));
    let service =
        make_service(users_returning(vec![sam, fran]), requests).with_policy(WorkflowPolicy {
            allow_redecision: true,
            require_faculty_approval: false,
        });

    let decided = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Approved,
            feedback: None,
            faculty_id: reviewer,
        })
        .await
        .expect("legacy overwrite succeeds");

    assert_eq!(decided.status, RequestStatus::Approved);
}

#[rstest]
#[tokio::test]
async fn decide_reports_conflict_for_decided_request(sam: User, fran: User) {
    let pending = pending_for(&sam);
    let request_id = pending.id;
    let reviewer = *fran.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pending)));
    requests.expect_apply_decision().return_once(|_, _| {
        Err(CgpaRequestRepositoryError::status_conflict(
            RequestStatus::Approved,
        ))
    });
    let metrics = Arc::new(RecordingMetrics::default());
    let service = make_service(users_returning(vec![sam, fran]), requests)
        .with_metrics(metrics.clone());

    let error = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Rejected,
            feedback: None,
            faculty_id: reviewer,
        })
        .await
        .expect_err("already decided");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        metrics.calls(),
        vec![(Decision::Rejected, DecisionOutcomeKind::Conflict)]
    );
}

#[rstest]
#[tokio::test]
async fn decide_rejects_non_faculty(sam: User) {
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_find_by_id().never();
    let service = make_service(users_returning(vec![sam.clone()]), requests);

    let error = service
        .decide(DecisionCommand {
            request_id: CgpaRequestId::random(),
            decision: Decision::Approved,
            feedback: None,
            faculty_id: *sam.id(),
        })
        .await
        .expect_err("students cannot decide");

    assert_eq!(error.code(), ErrorCode::InvalidFaculty);
    assert_eq!(error.message(), "Invalid faculty ID");
}

#[rstest]
#[case(false, None)]
#[case(true, Some(ErrorCode::Forbidden))]
#[tokio::test]
async fn approval_gate_follows_policy(
    #[case] require_faculty_approval: bool,
    #[case] expected: Option<ErrorCode>,
    sam: User,
) {
    let newcomer = faculty("Nia", "CS", false);
    let pending = pending_for(&sam);
    let request_id = pending.id;
    let reviewer = *newcomer.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .returning(move |_| Ok(Some(pending.clone())));
    requests
        .expect_apply_decision()
        .returning(|decided, _| Ok(applied(decided, false)));
    let service =
        make_service(users_returning(vec![sam, newcomer]), requests).with_policy(WorkflowPolicy {
            allow_redecision: false,
            require_faculty_approval,
        });

    let result = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Rejected,
            feedback: None,
            faculty_id: reviewer,
        })
        .await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[rstest]
#[tokio::test]
async fn decide_refuses_other_departments(sam: User) {
    let outsider = faculty("Eve", "EE", true);
    let pending = pending_for(&sam);
    let request_id = pending.id;
    let reviewer = *outsider.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pending)));
    requests.expect_apply_decision().never();
    let service = make_service(users_returning(vec![sam, outsider]), requests);

    let error = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Approved,
            feedback: None,
            faculty_id: reviewer,
        })
        .await
        .expect_err("cross-department decision");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn legacy_request_is_decided_by_general_faculty(sam: User) {
    let general = faculty("Gus", "General", true);
    let mut legacy = pending_for(&sam);
    legacy.student_department = None;
    let request_id = legacy.id;
    let reviewer = *general.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(legacy)));
    requests
        .expect_apply_decision()
        .returning(|decided, _| Ok(applied(decided, true)));
    let service = make_service(users_returning(vec![sam, general]), requests);

    let decided = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Approved,
            feedback: None,
            faculty_id: reviewer,
        })
        .await
        .expect("backfilled decision");

    assert_eq!(decided.student_department, Some(Department::general()));
}

#[rstest]
#[tokio::test]
async fn missing_student_is_recorded_as_skipped_propagation(sam: User, fran: User) {
    let pending = pending_for(&sam);
    let request_id = pending.id;
    let reviewer = *fran.id();
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pending)));
    requests
        .expect_apply_decision()
        .returning(|decided, _| Ok(applied(decided, false)));
    let metrics = Arc::new(RecordingMetrics::default());
    let service =
        make_service(users_returning(vec![fran]), requests).with_metrics(metrics.clone());

    let decided = service
        .decide(DecisionCommand {
            request_id,
            decision: Decision::Approved,
            feedback: None,
            faculty_id: reviewer,
        })
        .await
        .expect("status still stored");

    assert_eq!(decided.status, RequestStatus::Approved);
    assert_eq!(
        metrics.calls(),
        vec![(Decision::Approved, DecisionOutcomeKind::PropagationSkipped)]
    );
}

#[rstest]
#[tokio::test]
async fn bulk_decide_reports_each_id_independently(sam: User, fran: User) {
    let first = pending_for(&sam);
    let third = pending_for(&sam);
    let missing = CgpaRequestId::random();
    let ids = vec![
        first.id.to_string(),
        missing.to_string(),
        "not-a-uuid".to_owned(),
        third.id.to_string(),
    ];
    let stored = vec![first, third];
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_find_by_id()
        .returning(move |id| Ok(stored.iter().find(|r| &r.id == id).cloned()));
    requests
        .expect_apply_decision()
        .times(2)
        .returning(|decided, _| Ok(applied(decided, true)));
    let service = make_service(users_returning(vec![sam, fran.clone()]), requests);

    let entries = service
        .bulk_decide(BulkDecisionCommand {
            request_ids: ids.clone(),
            decision: Decision::Approved,
            feedback: None,
            faculty_id: *fran.id(),
        })
        .await
        .expect("bulk call succeeds");

    let returned: Vec<_> = entries.iter().map(|e| e.request_id.clone()).collect();
    assert_eq!(returned, ids);
    let codes: Vec<_> = entries
        .iter()
        .map(|entry| entry.result.as_ref().err().map(Error::code))
        .collect();
    assert_eq!(
        codes,
        vec![
            None,
            Some(ErrorCode::NotFound),
            Some(ErrorCode::InvalidRequest),
            None
        ]
    );
}

#[rstest]
#[tokio::test]
async fn bulk_decide_rejects_empty_batch(fran: User) {
    let service = make_service(
        users_returning(vec![fran.clone()]),
        MockCgpaRequestRepository::new(),
    );

    let error = service
        .bulk_decide(BulkDecisionCommand {
            request_ids: Vec::new(),
            decision: Decision::Rejected,
            feedback: None,
            faculty_id: *fran.id(),
        })
        .await
        .expect_err("empty batch");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn bulk_decide_fails_whole_call_for_invalid_faculty(sam: User) {
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_find_by_id().never();
    let service = make_service(users_returning(vec![sam.clone()]), requests);

    let error = service
        .bulk_decide(BulkDecisionCommand {
            request_ids: vec![CgpaRequestId::random().to_string()],
            decision: Decision::Approved,
            feedback: None,
            faculty_id: *sam.id(),
        })
        .await
        .expect_err("not faculty");

    assert_eq!(error.code(), ErrorCode::InvalidFaculty);
}

#[rstest]
#[tokio::test]
async fn queue_filters_by_department_and_defaults_to_pending(sam: User, fran: User) {
    let pending = pending_for(&sam);
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_list()
        .withf(|filter| {
            filter.department.as_ref().map(AsRef::as_ref) == Some("CS")
                && filter.status == Some(RequestStatus::Pending)
                && filter.student_id.is_none()
        })
        .return_once(move |_| Ok(vec![pending]));
    let service = make_service(users_returning(vec![sam.clone(), fran.clone()]), requests);

    let views = service
        .department_queue(fran.id(), None)
        .await
        .expect("queue loads");

    assert_eq!(views.len(), 1);
    let student_view = views[0].student.as_ref().expect("student summary");
    assert_eq!(student_view.id, *sam.id());
    assert_eq!(student_view.student_number.as_deref(), Some("S-Sam"));
    assert!(views[0].reviewer.is_none());
}

#[rstest]
#[tokio::test]
async fn queue_requires_faculty(sam: User) {
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_list().never();
    let service = make_service(users_returning(vec![sam.clone()]), requests);

    let error = service
        .department_queue(sam.id(), Some(RequestStatus::Approved))
        .await
        .expect_err("students have no queue");

    assert_eq!(error.code(), ErrorCode::InvalidFaculty);
}

#[rstest]
#[tokio::test]
async fn student_history_includes_reviewer(sam: User, fran: User) {
    let decided = pending_for(&sam).decided(Decision::Rejected, None, *fran.id(), fixed_now());
    let mut requests = MockCgpaRequestRepository::new();
    requests
        .expect_list()
        .withf(|filter| filter.status.is_none() && filter.department.is_none())
        .return_once(move |_| Ok(vec![decided]));
    let service = make_service(users_returning(vec![sam.clone(), fran.clone()]), requests);

    let views = service
        .student_requests(sam.id())
        .await
        .expect("history loads");

    let reviewer = views[0].reviewer.as_ref().expect("reviewer summary");
    assert_eq!(reviewer.email, *fran.email());
}

#[rstest]
#[tokio::test]
async fn student_history_is_empty_without_lookups(sam: User) {
    let mut users = MockUserRepository::new();
    let lookup = sam.clone();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(lookup)));
    users.expect_find_many().never();
    let mut requests = MockCgpaRequestRepository::new();
    requests.expect_list().return_once(|_| Ok(Vec::new()));
    let service = make_service(users, requests);

    let views = service
        .student_requests(sam.id())
        .await
        .expect("history loads");

    assert!(views.is_empty());
}
