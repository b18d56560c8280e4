//! PostgreSQL-backed `CgpaRequestRepository` implementation using Diesel ORM.
//!
//! Decisions run inside one transaction: a conditional `UPDATE ... RETURNING`
//! on the request, then, for approvals, a targeted update of the student's
//! cgpa. A zero-row update is disambiguated by re-reading the stored status.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    CgpaRequestRepository, CgpaRequestRepositoryError, DecisionOutcome, RequestFilter,
    TransitionGuard,
};
use crate::domain::{CgpaRequestId, CgpaUpdateRequest, RequestStatus, Role};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, non_negative_count, pool_error_message,
};
use super::models::{CgpaRequestRow, DecisionChangeset, NewCgpaRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cgpa_requests, users};

/// Diesel-backed implementation of the [`CgpaRequestRepository`] port.
#[derive(Clone)]
pub struct DieselCgpaRequestRepository {
    pool: DbPool,
}

impl DieselCgpaRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CgpaRequestRepositoryError {
    CgpaRequestRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CgpaRequestRepositoryError {
    match classify_diesel_error(error, "cgpa_requests") {
        DieselFailure::Connection(message) => CgpaRequestRepositoryError::connection(message),
        DieselFailure::Query(message) => CgpaRequestRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            CgpaRequestRepositoryError::query("cgpa request already exists")
        }
    }
}

fn to_domain(row: CgpaRequestRow) -> Result<CgpaUpdateRequest, CgpaRequestRepositoryError> {
    CgpaUpdateRequest::try_from(row).map_err(CgpaRequestRepositoryError::query)
}

/// Translate a filter into a boxed query so the predicate runs in SQL.
fn filtered(filter: &RequestFilter) -> cgpa_requests::BoxedQuery<'_, Pg> {
    let mut query = cgpa_requests::table.into_boxed();
    if let Some(student_id) = filter.student_id {
        query = query.filter(cgpa_requests::student_id.eq(*student_id.as_uuid()));
    }
    if let Some(department) = &filter.department {
        query = query.filter(cgpa_requests::student_department.eq(department.as_ref()));
    }
    if let Some(status) = filter.status {
        query = query.filter(cgpa_requests::status.eq(status.as_str()));
    }
    if let Some(reviewer) = filter.reviewed_by {
        query = query.filter(cgpa_requests::reviewed_by.eq(*reviewer.as_uuid()));
    }
    query
}

/// What the decision transaction observed.
enum DecisionWrite {
    Applied {
        row: CgpaRequestRow,
        propagated: bool,
    },
    Missing,
    Conflict(String),
}

#[async_trait]
impl CgpaRequestRepository for DieselCgpaRequestRepository {
    async fn create(&self, request: &CgpaUpdateRequest) -> Result<(), CgpaRequestRepositoryError> {
        let row = NewCgpaRequestRow::from_domain(request)
            .map_err(CgpaRequestRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(cgpa_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &CgpaRequestId,
    ) -> Result<Option<CgpaUpdateRequest>, CgpaRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        cgpa_requests::table
            .filter(cgpa_requests::id.eq(id.as_uuid()))
            .select(CgpaRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_domain)
            .transpose()
    }

    async fn list(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<CgpaUpdateRequest>, CgpaRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        filtered(filter)
            .select(CgpaRequestRow::as_select())
            .order((cgpa_requests::created_at.desc(), cgpa_requests::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn count(&self, filter: &RequestFilter) -> Result<u64, CgpaRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(non_negative_count(total))
    }

    async fn apply_decision(
        &self,
        decided: &CgpaUpdateRequest,
        guard: TransitionGuard,
    ) -> Result<DecisionOutcome, CgpaRequestRepositoryError> {
        let request_id = *decided.id.as_uuid();
        let student_id = *decided.student_id.as_uuid();
        let approved_cgpa =
            (decided.status == RequestStatus::Approved).then(|| decided.new_cgpa.value());
        let changes = DecisionChangeset::from(decided);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let write = conn
            .transaction(|conn| {
                async move {
                    let target = cgpa_requests::table.filter(cgpa_requests::id.eq(request_id));
                    let updated: Option<CgpaRequestRow> = match guard {
                        TransitionGuard::RequirePending => {
                            diesel::update(target.filter(
                                cgpa_requests::status.eq(RequestStatus::Pending.as_str()),
                            ))
                            .set(&changes)
                            .returning(CgpaRequestRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?
                        }
                        TransitionGuard::Unguarded => diesel::update(target)
                            .set(&changes)
                            .returning(CgpaRequestRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?,
                    };

                    let Some(row) = updated else {
                        let actual: Option<String> = cgpa_requests::table
                            .filter(cgpa_requests::id.eq(request_id))
                            .select(cgpa_requests::status)
                            .first(conn)
                            .await
                            .optional()?;
                        return Ok(actual.map_or(DecisionWrite::Missing, DecisionWrite::Conflict));
                    };

                    let mut propagated = false;
                    if let Some(cgpa) = approved_cgpa {
                        let rows = diesel::update(
                            users::table
                                .filter(users::id.eq(student_id))
                                .filter(users::role.eq(Role::Student.as_str())),
                        )
                        .set((users::cgpa.eq(cgpa), users::updated_at.eq(diesel::dsl::now)))
                        .execute(conn)
                        .await?;
                        propagated = rows > 0;
                    }
                    Ok(DecisionWrite::Applied { row, propagated })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match write {
            DecisionWrite::Applied { row, propagated } => Ok(DecisionOutcome {
                request: to_domain(row)?,
                cgpa_propagated: propagated,
            }),
            DecisionWrite::Missing => Err(CgpaRequestRepositoryError::missing(
                decided.id.to_string(),
            )),
            DecisionWrite::Conflict(status) => {
                let actual = status
                    .parse::<RequestStatus>()
                    .map_err(|err| CgpaRequestRepositoryError::query(err.to_string()))?;
                Err(CgpaRequestRepositoryError::status_conflict(actual))
            }
        }
    }
}
