//! Behaviour tests for the CGPA update approval workflow.
//!
//! Scenarios drive the workflow service over the in-process store, so every
//! decision exercises the same atomic status change and cgpa write-back the
//! server uses when no database is configured.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::future::Future;
use std::sync::Arc;

use cgpa_portal::domain::ports::{
    BulkDecisionCommand, BulkDecisionEntry, CgpaRequestCommand, CgpaRequestQuery,
    DecisionCommand, UserRepository,
};
use cgpa_portal::domain::{
    AcademicProfile, Cgpa, CgpaRequestId, CgpaSubmission, CgpaUpdateRequest, CgpaWorkflowService,
    Decision, Department, Email, Error, ErrorCode, PersonName, RequestStatus, User, UserDraft,
    UserId, WorkflowPolicy,
};
use cgpa_portal::outbound::memory::InMemoryStore;
use chrono::Utc;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

struct World {
    store: Arc<InMemoryStore>,
    policy: WorkflowPolicy,
    student: Option<UserId>,
    cs_faculty: Option<UserId>,
    ee_faculty: Option<UserId>,
    submitted: Vec<CgpaUpdateRequest>,
    last_submission: Option<Result<CgpaUpdateRequest, Error>>,
    last_decision: Option<Result<CgpaUpdateRequest, Error>>,
    bulk: Option<Vec<BulkDecisionEntry>>,
}

impl World {
    fn workflow(&self) -> CgpaWorkflowService<InMemoryStore, InMemoryStore> {
        CgpaWorkflowService::new(
            self.store.clone(),
            self.store.clone(),
            Arc::new(DefaultClock),
        )
        .with_policy(self.policy)
    }

    fn insert(&self, user: &User) {
        run_async(self.store.create(user)).expect("seed user");
    }

    fn student_id(&self) -> UserId {
        self.student.expect("student seeded")
    }

    fn faculty_id(&self, dept: &str) -> UserId {
        match dept {
            "CS" => self.cs_faculty.expect("CS faculty seeded"),
            "EE" => self.ee_faculty.expect("EE faculty seeded"),
            other => panic!("no faculty seeded for {other}"),
        }
    }

    fn latest_request(&self) -> &CgpaUpdateRequest {
        self.submitted.last().expect("a submitted request")
    }

    fn decided(&self) -> &CgpaUpdateRequest {
        match self.last_decision.as_ref().expect("a decision") {
            Ok(request) => request,
            Err(error) => panic!("expected decision to succeed: {error:?}"),
        }
    }

    fn decision_error(&self) -> &Error {
        match self.last_decision.as_ref().expect("a decision") {
            Ok(request) => panic!("expected decision to fail, got {request:?}"),
            Err(error) => error,
        }
    }
}

fn user(first: &str, department: &str, profile: AcademicProfile) -> User {
    User::try_from(UserDraft {
        id: UserId::random(),
        email: Email::new(format!("{}@example.edu", first.to_lowercase())).expect("email"),
        password_hash: "unused".to_owned(),
        first_name: PersonName::new(first).expect("first name"),
        last_name: PersonName::new("Tester").expect("last name"),
        department: Some(Department::new(department).expect("department")),
        profile,
        created_at: Utc::now(),
    })
    .expect("valid user")
}

#[fixture]
fn world() -> World {
    World {
        store: Arc::new(InMemoryStore::new()),
        policy: WorkflowPolicy::default(),
        student: None,
        cs_faculty: None,
        ee_faculty: None,
        submitted: Vec::new(),
        last_submission: None,
        last_decision: None,
        bulk: None,
    }
}

#[given("a CS student with cgpa {cgpa}")]
fn a_cs_student_with_cgpa(world: &mut World, cgpa: f64) {
    let sam = user(
        "Sam",
        "CS",
        AcademicProfile::Student {
            student_number: Some("S-1001".to_owned()),
            cgpa: Cgpa::new(cgpa).expect("cgpa"),
        },
    );
    world.insert(&sam);
    world.student = Some(*sam.id());
}

#[given("faculty members in CS and EE")]
fn faculty_members_in_cs_and_ee(world: &mut World) {
    let ada = user(
        "Ada",
        "CS",
        AcademicProfile::Faculty {
            faculty_id: "F-CS-1".to_owned(),
            approved: true,
        },
    );
    let eli = user(
        "Eli",
        "EE",
        AcademicProfile::Faculty {
            faculty_id: "F-EE-1".to_owned(),
            approved: true,
        },
    );
    world.insert(&ada);
    world.insert(&eli);
    world.cs_faculty = Some(*ada.id());
    world.ee_faculty = Some(*eli.id());
}

#[given("re-decision is allowed")]
fn re_decision_is_allowed(world: &mut World) {
    world.policy.allow_redecision = true;
}

#[when("the student submits {cgpa} for \"{semester}\"")]
fn the_student_submits(world: &mut World, cgpa: f64, semester: String) {
    let student_id = world.student_id();
    let result = run_async(world.workflow().submit(
        &student_id,
        CgpaSubmission {
            new_cgpa: cgpa,
            semester,
            documents: Vec::new(),
        },
    ));
    if let Ok(request) = &result {
        world.submitted.push(request.clone());
    }
    world.last_submission = Some(result);
}

fn decide(world: &mut World, dept: &str, decision: Decision, feedback: Option<String>) {
    let command = DecisionCommand {
        request_id: world.latest_request().id,
        decision,
        feedback,
        faculty_id: world.faculty_id(dept),
    };
    world.last_decision = Some(run_async(world.workflow().decide(command)));
}

#[when("the {dept} faculty approves the request with feedback \"{feedback}\"")]
fn the_faculty_approves(world: &mut World, dept: String, feedback: String) {
    decide(world, &dept, Decision::Approved, Some(feedback));
}

#[when("the {dept} faculty rejects the request")]
fn the_faculty_rejects(world: &mut World, dept: String) {
    decide(world, &dept, Decision::Rejected, None);
}

#[when("the CS faculty bulk approves the first request, an unknown id, and the second request")]
fn the_cs_faculty_bulk_approves(world: &mut World) {
    let [first, second] = [&world.submitted[0], &world.submitted[1]].map(|r| r.id.to_string());
    let command = BulkDecisionCommand {
        request_ids: vec![first, CgpaRequestId::random().to_string(), second],
        decision: Decision::Approved,
        feedback: None,
        faculty_id: world.faculty_id("CS"),
    };
    let entries = run_async(world.workflow().bulk_decide(command)).expect("bulk decision");
    world.bulk = Some(entries);
}

#[then("the request is pending with current cgpa {cgpa} in department \"{dept}\"")]
fn the_request_is_pending(world: &mut World, cgpa: f64, dept: String) {
    let request = world.latest_request();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.current_cgpa.value(), cgpa);
    assert_eq!(
        request.student_department.as_ref().map(ToString::to_string).as_deref(),
        Some(dept.as_str())
    );
    assert_eq!(request.student_id, world.student_id());
}

#[then("the submission fails as invalid input")]
fn the_submission_fails_as_invalid_input(world: &mut World) {
    match world.last_submission.as_ref().expect("a submission") {
        Ok(request) => panic!("expected submission to fail, got {request:?}"),
        Err(error) => assert_eq!(error.code(), ErrorCode::InvalidRequest),
    }
}

#[then("the student has no requests")]
fn the_student_has_no_requests(world: &mut World) {
    let student_id = world.student_id();
    let views = run_async(world.workflow().student_requests(&student_id)).expect("history");
    assert!(views.is_empty());
}

fn queue_for(world: &World, dept: &str) -> Vec<CgpaRequestId> {
    let faculty_id = world.faculty_id(dept);
    run_async(world.workflow().department_queue(&faculty_id, None))
        .expect("queue")
        .into_iter()
        .map(|view| view.request.id)
        .collect()
}

#[then("the {dept} queue lists the request")]
fn the_queue_lists_the_request(world: &mut World, dept: String) {
    assert_eq!(queue_for(world, &dept), vec![world.latest_request().id]);
}

#[then("the {dept} queue is empty")]
fn the_queue_is_empty(world: &mut World, dept: String) {
    assert!(queue_for(world, &dept).is_empty());
}

#[then("the request is approved by the CS faculty")]
fn the_request_is_approved_by_cs_faculty(world: &mut World) {
    let request = world.decided();
    assert_eq!(request.status, RequestStatus::Approved);
    assert_eq!(request.reviewed_by, world.cs_faculty);
    assert_eq!(request.feedback.as_deref(), Some("Good work"));
    assert!(request.reviewed_at.is_some());
}

#[then("the request is rejected")]
fn the_request_is_rejected(world: &mut World) {
    assert_eq!(world.decided().status, RequestStatus::Rejected);
}

#[then("the student's cgpa is {cgpa}")]
fn the_students_cgpa_is(world: &mut World, cgpa: f64) {
    let student_id = world.student_id();
    let student = run_async(world.store.find_by_id(&student_id))
        .expect("lookup")
        .expect("student exists");
    assert_eq!(student.cgpa().map(Cgpa::value), Some(cgpa));
}

#[then("the decision fails as forbidden")]
fn the_decision_fails_as_forbidden(world: &mut World) {
    assert_eq!(world.decision_error().code(), ErrorCode::Forbidden);
}

#[then("the decision fails as a conflict")]
fn the_decision_fails_as_a_conflict(world: &mut World) {
    assert_eq!(world.decision_error().code(), ErrorCode::Conflict);
}

#[then("bulk entries 1 and 3 succeed")]
fn bulk_entries_one_and_three_succeed(world: &mut World) {
    let entries = world.bulk.as_ref().expect("bulk entries");
    assert_eq!(entries.len(), 3);
    for index in [0, 2] {
        let entry = &entries[index];
        let request = entry.result.as_ref().expect("entry should succeed");
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(entry.request_id, world.submitted[index / 2].id.to_string());
    }
}

#[then("bulk entry 2 fails as not found")]
fn bulk_entry_two_fails_as_not_found(world: &mut World) {
    let entries = world.bulk.as_ref().expect("bulk entries");
    let error = entries[1].result.as_ref().expect_err("entry should fail");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Submitting snapshots the student's cgpa and department"
)]
fn submitting_snapshots_the_students_cgpa(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Out of range cgpa is rejected before persistence"
)]
fn out_of_range_cgpa_is_rejected(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Queues are scoped to the reviewer's department"
)]
fn queues_are_scoped_to_department(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Approval propagates the new cgpa"
)]
fn approval_propagates_the_new_cgpa(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Rejection leaves the student untouched"
)]
fn rejection_leaves_the_student_untouched(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Faculty from another department cannot decide"
)]
fn other_department_cannot_decide(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Deciding twice conflicts by default"
)]
fn deciding_twice_conflicts_by_default(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Re-decision overwrites the first decision when allowed"
)]
fn redecision_overwrites_when_allowed(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/cgpa_workflow.feature",
    name = "Bulk decisions report each id independently"
)]
fn bulk_decisions_report_each_id(world: World) {
    drop(world);
}
