//! In-process store implementing both repository ports.
//!
//! Used when no database URL is configured and by integration tests. Users
//! and requests share one lock so a decision and its cgpa write-back are
//! applied atomically, mirroring the database transaction.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CgpaRequestRepository, CgpaRequestRepositoryError, DecisionOutcome, RequestFilter,
    TransitionGuard, UserRepository, UserRepositoryError,
};
use crate::domain::{
    CgpaRequestId, CgpaUpdateRequest, Department, Email, RequestStatus, Role, User, UserId,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    /// Insertion order doubles as the tie-breaker for equal timestamps.
    requests: Vec<CgpaUpdateRequest>,
}

impl State {
    fn request_mut(&mut self, id: &CgpaRequestId) -> Option<&mut CgpaUpdateRequest> {
        self.requests.iter_mut().find(|request| &request.id == id)
    }
}

/// Mutex-guarded store for users and requests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if state.users.values().any(|known| known.email() == user.email()) {
            return Err(UserRepositoryError::duplicate_email(user.email().as_ref()));
        }
        if let Some(faculty_id) = user.faculty_id() {
            if state
                .users
                .values()
                .any(|known| known.faculty_id() == Some(faculty_id))
            {
                return Err(UserRepositoryError::duplicate_faculty_id(faculty_id));
            }
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn list_students_in_department(
        &self,
        department: &Department,
    ) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state
            .users
            .values()
            .filter(|user| {
                user.role() == Role::Student && user.department() == Some(department)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CgpaRequestRepository for InMemoryStore {
    async fn create(&self, request: &CgpaUpdateRequest) -> Result<(), CgpaRequestRepositoryError> {
        let mut state = self.lock().map_err(CgpaRequestRepositoryError::query)?;
        if state.request_mut(&request.id).is_some() {
            return Err(CgpaRequestRepositoryError::query(
                "cgpa request already exists",
            ));
        }
        state.requests.push(request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CgpaRequestId,
    ) -> Result<Option<CgpaUpdateRequest>, CgpaRequestRepositoryError> {
        let state = self.lock().map_err(CgpaRequestRepositoryError::query)?;
        Ok(state
            .requests
            .iter()
            .find(|request| &request.id == id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<CgpaUpdateRequest>, CgpaRequestRepositoryError> {
        let state = self.lock().map_err(CgpaRequestRepositoryError::query)?;
        let mut matching: Vec<CgpaUpdateRequest> = state
            .requests
            .iter()
            .rev()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn count(&self, filter: &RequestFilter) -> Result<u64, CgpaRequestRepositoryError> {
        let state = self.lock().map_err(CgpaRequestRepositoryError::query)?;
        let total = state
            .requests
            .iter()
            .filter(|request| filter.matches(request))
            .count();
        u64::try_from(total).map_err(|err| CgpaRequestRepositoryError::query(err.to_string()))
    }

    async fn apply_decision(
        &self,
        decided: &CgpaUpdateRequest,
        guard: TransitionGuard,
    ) -> Result<DecisionOutcome, CgpaRequestRepositoryError> {
        let mut state = self.lock().map_err(CgpaRequestRepositoryError::query)?;
        let Some(stored) = state.request_mut(&decided.id) else {
            return Err(CgpaRequestRepositoryError::missing(decided.id.to_string()));
        };
        if guard == TransitionGuard::RequirePending && stored.status.is_terminal() {
            return Err(CgpaRequestRepositoryError::status_conflict(stored.status));
        }
        stored.status = decided.status;
        stored.student_department.clone_from(&decided.student_department);
        stored.reviewed_by = decided.reviewed_by;
        stored.feedback.clone_from(&decided.feedback);
        stored.reviewed_at = decided.reviewed_at;
        stored.updated_at = decided.updated_at;
        let request = stored.clone();

        let cgpa_propagated = request.status == RequestStatus::Approved
            && state
                .users
                .get_mut(&request.student_id)
                .is_some_and(|student| student.set_cgpa(request.new_cgpa));
        Ok(DecisionOutcome {
            request,
            cgpa_propagated,
        })
    }
}
