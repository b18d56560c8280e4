//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use cgpa_portal::domain::ports::{
    CgpaRequestRepository, DecisionMetrics, NoOpDecisionMetrics, UserRepository,
};
use cgpa_portal::domain::{AccountService, CgpaWorkflowService, DashboardService, WorkflowPolicy};
use cgpa_portal::inbound::http::state::HttpState;
use cgpa_portal::outbound::memory::InMemoryStore;
use cgpa_portal::outbound::persistence::{DieselCgpaRequestRepository, DieselUserRepository};
use cgpa_portal::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Assemble the three services over a pair of repositories.
fn services_over<U, R>(
    users: Arc<U>,
    requests: Arc<R>,
    policy: WorkflowPolicy,
    metrics: Arc<dyn DecisionMetrics>,
) -> HttpState
where
    U: UserRepository + 'static,
    R: CgpaRequestRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let accounts = AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher),
        clock.clone(),
    );
    let workflow = CgpaWorkflowService::new(users.clone(), requests.clone(), clock)
        .with_policy(policy)
        .with_metrics(metrics);
    let dashboard = DashboardService::new(users, requests);
    HttpState::new(Arc::new(accounts), Arc::new(workflow), Arc::new(dashboard))
}

/// Pick the decision recorder for this configuration.
#[cfg(feature = "metrics")]
fn build_decision_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn DecisionMetrics>> {
    use cgpa_portal::outbound::metrics::PrometheusDecisionMetrics;

    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusDecisionMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("decision metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpDecisionMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_decision_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn DecisionMetrics>> {
    Ok(Arc::new(NoOpDecisionMetrics))
}

/// Build the HTTP state, backed by PostgreSQL when a pool is configured and
/// by an in-process store otherwise.
///
/// # Errors
///
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let metrics = build_decision_metrics(config)?;
    let state = match &config.db_pool {
        Some(pool) => services_over(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselCgpaRequestRepository::new(pool.clone())),
            config.policy,
            metrics,
        ),
        None => {
            tracing::warn!("no database configured; using the in-process store");
            let store = Arc::new(InMemoryStore::new());
            services_over(store.clone(), store, config.policy, metrics)
        }
    };
    Ok(web::Data::new(state))
}
