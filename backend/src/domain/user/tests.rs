//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn name(raw: &str) -> PersonName {
    PersonName::new(raw).expect("valid name")
}

#[fixture]
fn student_draft() -> UserDraft {
    UserDraft {
        id: UserId::new(VALID_ID).expect("valid id"),
        email: Email::new("ada@example.edu").expect("valid email"),
        password_hash: "$argon2id$stub".to_owned(),
        first_name: name("Ada"),
        last_name: name("Lovelace"),
        department: Some(Department::new("CS").expect("department")),
        profile: AcademicProfile::Student {
            student_number: Some("S-100".to_owned()),
            cgpa: Cgpa::new(7.5).expect("cgpa"),
        },
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[fixture]
fn faculty_draft(student_draft: UserDraft) -> UserDraft {
    UserDraft {
        profile: AcademicProfile::Faculty {
            faculty_id: "F-1".to_owned(),
            approved: false,
        },
        ..student_draft
    }
}

#[rstest]
#[case(0.0)]
#[case(7.25)]
#[case(10.0)]
fn cgpa_accepts_closed_range(#[case] value: f64) {
    let cgpa = Cgpa::new(value).expect("in range");
    assert_eq!(cgpa.value(), value);
}

#[rstest]
#[case(-0.01)]
#[case(10.01)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn cgpa_rejects_out_of_range(#[case] value: f64) {
    assert_eq!(Cgpa::new(value), Err(UserValidationError::CgpaOutOfRange));
}

#[rstest]
#[case("  Ada@Example.EDU ", "ada@example.edu")]
#[case("x@y", "x@y")]
fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(Email::new(raw).expect("valid email").as_ref(), expected);
}

#[rstest]
#[case("")]
#[case("no-at-sign")]
#[case("@example.edu")]
#[case("ada@")]
#[case("a b@example.edu")]
#[case("a@b@c")]
fn email_rejects_malformed(#[case] raw: &str) {
    assert_eq!(Email::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
fn department_rejects_blank() {
    assert_eq!(
        Department::new("   "),
        Err(UserValidationError::EmptyDepartment)
    );
}

#[rstest]
fn person_name_rejects_overlong() {
    let long = "a".repeat(LABEL_MAX + 1);
    assert_eq!(
        PersonName::new(long),
        Err(UserValidationError::NameTooLong { max: LABEL_MAX })
    );
}

#[rstest]
#[case("student", Role::Student)]
#[case(" Faculty ", Role::Faculty)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>().expect("known role"), expected);
}

#[rstest]
fn role_rejects_unknown() {
    assert!(matches!(
        "admin".parse::<Role>(),
        Err(UserValidationError::UnknownRole(_))
    ));
}

#[rstest]
fn user_id_rejects_padded_uuid() {
    assert_eq!(
        UserId::new(format!(" {VALID_ID} ")),
        Err(UserValidationError::InvalidId)
    );
}

#[rstest]
fn student_exposes_student_fields(student_draft: UserDraft) {
    let user = User::try_from(student_draft).expect("valid student");
    assert_eq!(user.role(), Role::Student);
    assert_eq!(user.cgpa(), Some(Cgpa::new(7.5).expect("cgpa")));
    assert_eq!(user.student_number(), Some("S-100"));
    assert!(user.faculty_id().is_none());
    assert_eq!(user.full_name(), "Ada Lovelace");
}

#[rstest]
fn faculty_has_no_cgpa(faculty_draft: UserDraft) {
    let user = User::try_from(faculty_draft).expect("valid faculty");
    assert_eq!(user.role(), Role::Faculty);
    assert!(user.cgpa().is_none());
    assert_eq!(user.faculty_id(), Some("F-1"));
    assert!(!user.is_approved_faculty());
}

#[rstest]
fn faculty_requires_department(faculty_draft: UserDraft) {
    let draft = UserDraft {
        department: None,
        ..faculty_draft
    };
    assert_eq!(
        User::try_from(draft),
        Err(UserValidationError::FacultyWithoutDepartment)
    );
}

#[rstest]
fn faculty_department_only_resolves_for_faculty(
    student_draft: UserDraft,
    faculty_draft: UserDraft,
) {
    let student = User::try_from(student_draft).expect("valid student");
    let faculty = User::try_from(faculty_draft).expect("valid faculty");
    let unplaced = User {
        department: None,
        ..faculty.clone()
    };

    assert!(student.faculty_department().is_none());
    assert_eq!(
        faculty.faculty_department().map(ToString::to_string).as_deref(),
        Some("CS")
    );
    assert!(unplaced.faculty_department().is_none());
}

#[rstest]
fn faculty_requires_faculty_id(faculty_draft: UserDraft) {
    let draft = UserDraft {
        profile: AcademicProfile::Faculty {
            faculty_id: "  ".to_owned(),
            approved: true,
        },
        ..faculty_draft
    };
    assert_eq!(
        User::try_from(draft),
        Err(UserValidationError::EmptyFacultyId)
    );
}

#[rstest]
fn student_without_department_is_valid(student_draft: UserDraft) {
    let draft = UserDraft {
        department: None,
        ..student_draft
    };
    let user = User::try_from(draft).expect("students may omit department");
    assert!(user.department().is_none());
}

#[rstest]
fn set_cgpa_only_touches_students(student_draft: UserDraft, faculty_draft: UserDraft) {
    let target = Cgpa::new(9.1).expect("cgpa");
    let mut student = User::try_from(student_draft).expect("student");
    let mut faculty = User::try_from(faculty_draft).expect("faculty");

    assert!(student.set_cgpa(target));
    assert_eq!(student.cgpa(), Some(target));
    assert!(!faculty.set_cgpa(target));
    assert!(faculty.cgpa().is_none());
}
