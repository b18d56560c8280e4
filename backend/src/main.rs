//! Portal entry-point: loads settings, opens persistence, and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cgpa_portal::inbound::http::health::HealthState;
use cgpa_portal::inbound::http::session_config::{BuildMode, session_settings_from_env};
use cgpa_portal::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use cgpa_portal::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::from_process().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr).with_policy(settings.workflow_policy());
    if let Some(pool) = open_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_middleware()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "portal listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Run migrations and open the connection pool when a database is configured.
async fn open_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        return Ok(None);
    };
    if settings.skip_migrations {
        info!("skipping database migrations");
    } else {
        run_migrations(url).await.map_err(std::io::Error::other)?;
    }
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(std::io::Error::other)?;
    Ok(Some(pool))
}
