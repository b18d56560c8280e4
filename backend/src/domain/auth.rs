//! Login and registration input primitives.
//!
//! Handlers build these from raw payloads before calling a port, so services
//! only ever see validated values. Passwords are held in [`Zeroizing`]
//! buffers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Department, Email, PersonName, Role, UserValidationError};

/// Shortest password accepted at registration.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    InvalidEmail,
    EmptyPassword,
    PasswordTooShort { min: usize },
    InvalidFirstName(UserValidationError),
    InvalidLastName(UserValidationError),
    UnknownRole(String),
    InvalidDepartment,
    MissingDepartment,
    MissingFacultyId,
}

impl AccountValidationError {
    /// Wire-level field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::InvalidFirstName(_) => "firstName",
            Self::InvalidLastName(_) => "lastName",
            Self::UnknownRole(_) => "role",
            Self::InvalidDepartment | Self::MissingDepartment => "department",
            Self::MissingFacultyId => "facultyId",
        }
    }

    /// Stable machine-readable code for error details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::InvalidFirstName(_) | Self::InvalidLastName(_) | Self::InvalidDepartment => {
                "invalid_value"
            }
            Self::UnknownRole(_) => "unknown_role",
            Self::MissingDepartment | Self::MissingFacultyId => "missing_field",
        }
    }
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::InvalidFirstName(err) => write!(f, "first name: {err}"),
            Self::InvalidLastName(err) => write!(f, "last name: {err}"),
            Self::UnknownRole(role) => {
                write!(f, "role must be 'student' or 'faculty', got '{role}'")
            }
            Self::InvalidDepartment => write!(f, "department must not be blank"),
            Self::MissingDepartment => write!(f, "department is required for faculty"),
            Self::MissingFacultyId => write!(f, "faculty ID is required for faculty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use cgpa_portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.edu", "hunter22").expect("valid");
/// assert_eq!(creds.email().as_ref(), "ada@example.edu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs. Password whitespace is kept.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        let email = Email::new(email).map_err(|_| AccountValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw registration payload.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department: Option<String>,
    pub student_number: Option<String>,
    pub faculty_id: Option<String>,
}

/// Role-specific registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationProfile {
    Student { student_number: Option<String> },
    Faculty { faculty_id: String },
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub password: Zeroizing<String>,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub department: Option<Department>,
    pub profile: RegistrationProfile,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl TryFrom<RegistrationForm> for Registration {
    type Error = AccountValidationError;

    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        let RegistrationForm {
            email,
            password,
            first_name,
            last_name,
            role,
            department,
            student_number,
            faculty_id,
        } = form;

        let email = Email::new(email).map_err(|_| AccountValidationError::InvalidEmail)?;
        let password = Zeroizing::new(password);
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(AccountValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        let first_name =
            PersonName::new(first_name).map_err(AccountValidationError::InvalidFirstName)?;
        let last_name =
            PersonName::new(last_name).map_err(AccountValidationError::InvalidLastName)?;
        let role: Role = role
            .parse()
            .map_err(|_| AccountValidationError::UnknownRole(role.clone()))?;
        let department = non_blank(department)
            .map(Department::new)
            .transpose()
            .map_err(|_| AccountValidationError::InvalidDepartment)?;

        let profile = match role {
            Role::Student => RegistrationProfile::Student {
                student_number: non_blank(student_number),
            },
            Role::Faculty => {
                if department.is_none() {
                    return Err(AccountValidationError::MissingDepartment);
                }
                let faculty_id =
                    non_blank(faculty_id).ok_or(AccountValidationError::MissingFacultyId)?;
                RegistrationProfile::Faculty { faculty_id }
            }
        };

        Ok(Self {
            email,
            password,
            first_name,
            last_name,
            department,
            profile,
        })
    }
}
