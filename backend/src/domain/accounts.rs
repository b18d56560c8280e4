//! Account registration, login, and profile lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::cgpa_workflow::map_user_error;
use crate::domain::ports::{
    CurrentUserQuery, LoginService, PasswordHasher, PasswordHasherError, RegistrationService,
    UserRepository,
};
use crate::domain::{
    AcademicProfile, Cgpa, Error, LoginCredentials, Registration, RegistrationProfile, User,
    UserDraft, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_EXISTS: &str = "User already exists";

/// Account service implementing the login, registration, and current-user
/// ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Create a service over the user repository and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hasher failed: {error}"))
}

fn profile_for(registration: &Registration) -> AcademicProfile {
    match &registration.profile {
        RegistrationProfile::Student { student_number } => AcademicProfile::Student {
            student_number: student_number.clone(),
            cgpa: Cgpa::ZERO,
        },
        RegistrationProfile::Faculty { faculty_id } => AcademicProfile::Faculty {
            faculty_id: faculty_id.clone(),
            approved: false,
        },
    }
}

#[async_trait]
impl<U, H> RegistrationService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict(USER_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(registration.password.as_str())
            .map_err(map_hasher_error)?;
        let profile = profile_for(&registration);
        let user = User::try_from(UserDraft {
            id: UserId::random(),
            email: registration.email,
            password_hash,
            first_name: registration.first_name,
            last_name: registration.last_name,
            department: registration.department,
            profile,
            created_at: self.clock.utc(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.users.create(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        match self
            .hasher
            .verify(credentials.password(), user.password_hash())
        {
            Ok(true) => Ok(user),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(error) => {
                warn!(user_id = %user.id(), %error, "stored password hash rejected");
                Err(map_hasher_error(error))
            }
        }
    }
}

#[async_trait]
impl<U, H> CurrentUserQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}
