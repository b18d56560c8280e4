//! Builders for domain records shared by unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{AcademicProfile, Cgpa, Department, Email, PersonName, User, UserDraft, UserId};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

fn draft(first: &str, department: Option<&str>, profile: AcademicProfile) -> UserDraft {
    UserDraft {
        id: UserId::random(),
        email: Email::new(format!("{}@example.edu", first.to_lowercase())).expect("email"),
        password_hash: "hash".to_owned(),
        first_name: PersonName::new(first).expect("first name"),
        last_name: PersonName::new("Tester").expect("last name"),
        department: department.map(|d| Department::new(d).expect("department")),
        profile,
        created_at: fixed_now(),
    }
}

pub(crate) fn student(first: &str, department: Option<&str>, cgpa: f64) -> User {
    User::try_from(draft(
        first,
        department,
        AcademicProfile::Student {
            student_number: Some(format!("S-{first}")),
            cgpa: Cgpa::new(cgpa).expect("cgpa"),
        },
    ))
    .expect("valid student")
}

pub(crate) fn faculty(first: &str, department: &str, approved: bool) -> User {
    User::try_from(draft(
        first,
        Some(department),
        AcademicProfile::Faculty {
            faculty_id: format!("F-{first}"),
            approved,
        },
    ))
    .expect("valid faculty")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixed_now(),
    })
}
