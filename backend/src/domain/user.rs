//! User identity and academic record.
//!
//! A user is either a student or a faculty member. The role-specific fields
//! live in [`AcademicProfile`], so a faculty record can never carry a cgpa and
//! a student record can never carry a faculty id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Department assigned when a student has none on record.
pub const GENERAL_DEPARTMENT: &str = "General";

/// Maximum length for person names and department labels.
pub const LABEL_MAX: usize = 100;

/// Validation errors raised while constructing user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    InvalidEmail,
    EmptyName,
    NameTooLong { max: usize },
    EmptyDepartment,
    FacultyWithoutDepartment,
    EmptyFacultyId,
    UnknownRole(String),
    CgpaOutOfRange,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyDepartment => write!(f, "department must not be empty"),
            Self::FacultyWithoutDepartment => write!(f, "faculty members require a department"),
            Self::EmptyFacultyId => write!(f, "faculty id must not be empty"),
            Self::UnknownRole(role) => {
                write!(f, "role must be 'student' or 'faculty', got '{role}'")
            }
            Self::CgpaOutOfRange => write!(f, "cgpa must be a number between 0 and 10"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID without re-parsing.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login email, normalised to trimmed lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn trimmed_label(raw: &str) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    if trimmed.chars().count() > LABEL_MAX {
        return Err(UserValidationError::NameTooLong { max: LABEL_MAX });
    }
    Ok(trimmed.to_owned())
}

/// A first or last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate a trimmed, non-empty name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        trimmed_label(raw.as_ref()).map(Self)
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Academic department label used for visibility scoping.
///
/// Comparison is exact: `"CS"` and `"cs"` are different departments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Department(String);

impl Department {
    /// Validate a trimmed, non-empty department label.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        trimmed_label(raw.as_ref())
            .map(Self)
            .map_err(|err| match err {
                UserValidationError::EmptyName => UserValidationError::EmptyDepartment,
                other => other,
            })
    }

    /// The fallback department for students without one.
    #[must_use]
    pub fn general() -> Self {
        Self(GENERAL_DEPARTMENT.to_owned())
    }
}

impl AsRef<str> for Department {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.0
    }
}

impl TryFrom<String> for Department {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role of a portal user. Immutable after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
}

impl Role {
    /// Lower-case wire and storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            _ => Err(UserValidationError::UnknownRole(s.to_owned())),
        }
    }
}

/// Cumulative grade point average on a 0 to 10 scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Cgpa(f64);

impl Cgpa {
    /// Lowest representable cgpa.
    pub const MIN: f64 = 0.0;
    /// Highest representable cgpa.
    pub const MAX: f64 = 10.0;
    /// Starting cgpa for newly registered students.
    pub const ZERO: Self = Self(0.0);

    /// Validate a finite value in `[0, 10]`.
    pub fn new(value: f64) -> Result<Self, UserValidationError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(UserValidationError::CgpaOutOfRange)
        }
    }

    /// Raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<Cgpa> for f64 {
    fn from(value: Cgpa) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Cgpa {
    type Error = UserValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Cgpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Role-specific fields of a user record.
#[derive(Debug, Clone, PartialEq)]
pub enum AcademicProfile {
    Student {
        /// Institution-issued student number, when known.
        student_number: Option<String>,
        cgpa: Cgpa,
    },
    Faculty {
        faculty_id: String,
        /// Set by an administrator; new faculty start unapproved.
        approved: bool,
    },
}

impl AcademicProfile {
    /// Role implied by the populated field set.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Faculty { .. } => Role::Faculty,
        }
    }
}

/// Unvalidated parts of a [`User`], used by registration and storage adapters.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub department: Option<Department>,
    pub profile: AcademicProfile,
    pub created_at: DateTime<Utc>,
}

/// Portal user.
///
/// ## Invariants
/// - Faculty always have a department.
/// - Faculty ids are non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    password_hash: String,
    first_name: PersonName,
    last_name: PersonName,
    department: Option<Department>,
    profile: AcademicProfile,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserDraft> for User {
    type Error = UserValidationError;

    fn try_from(draft: UserDraft) -> Result<Self, Self::Error> {
        let UserDraft {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            department,
            profile,
            created_at,
        } = draft;

        if let AcademicProfile::Faculty { faculty_id, .. } = &profile {
            if department.is_none() {
                return Err(UserValidationError::FacultyWithoutDepartment);
            }
            if faculty_id.trim().is_empty() {
                return Err(UserValidationError::EmptyFacultyId);
            }
        }

        Ok(Self {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            department,
            profile,
            created_at,
        })
    }
}

impl User {
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// PHC-formatted credential hash.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// `"First Last"` for display.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.as_ref(), self.last_name.as_ref())
    }

    pub fn department(&self) -> Option<&Department> {
        self.department.as_ref()
    }

    pub fn profile(&self) -> &AcademicProfile {
        &self.profile
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current cgpa for students, `None` for faculty.
    pub fn cgpa(&self) -> Option<Cgpa> {
        match &self.profile {
            AcademicProfile::Student { cgpa, .. } => Some(*cgpa),
            AcademicProfile::Faculty { .. } => None,
        }
    }

    /// Student number for students who supplied one.
    pub fn student_number(&self) -> Option<&str> {
        match &self.profile {
            AcademicProfile::Student { student_number, .. } => student_number.as_deref(),
            AcademicProfile::Faculty { .. } => None,
        }
    }

    /// Faculty id for faculty members.
    pub fn faculty_id(&self) -> Option<&str> {
        match &self.profile {
            AcademicProfile::Faculty { faculty_id, .. } => Some(faculty_id.as_str()),
            AcademicProfile::Student { .. } => None,
        }
    }

    /// Department a faculty member reviews for.
    ///
    /// `None` for students and for any faculty record lacking a department, so
    /// callers resolving a reviewer treat both as an invalid faculty id.
    pub fn faculty_department(&self) -> Option<&Department> {
        match self.profile {
            AcademicProfile::Faculty { .. } => self.department.as_ref(),
            AcademicProfile::Student { .. } => None,
        }
    }

    /// Whether this faculty member has been approved to act.
    pub fn is_approved_faculty(&self) -> bool {
        matches!(self.profile, AcademicProfile::Faculty { approved: true, .. })
    }

    /// Overwrite a student's cgpa. Returns `false` and changes nothing for faculty.
    pub fn set_cgpa(&mut self, value: Cgpa) -> bool {
        match &mut self.profile {
            AcademicProfile::Student { cgpa, .. } => {
                *cgpa = value;
                true
            }
            AcademicProfile::Faculty { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests;
