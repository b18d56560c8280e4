//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types;
//! row structs and the schema stay private to this module. Connections come
//! from a `bb8` pool via `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use cgpa_portal::outbound::persistence::{
//!     DbPool, DieselCgpaRequestRepository, DieselUserRepository, PoolConfig, run_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://portal@localhost/portal";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let requests = DieselCgpaRequestRepository::new(pool);
//! # let _ = (users, requests);
//! # Ok(())
//! # }
//! ```

mod diesel_cgpa_request_repository;
mod diesel_helpers;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_cgpa_request_repository::DieselCgpaRequestRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
