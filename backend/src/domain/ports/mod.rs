//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`DecisionMetrics`])
//! describe what the domain needs from infrastructure. Driving ports
//! ([`CgpaRequestCommand`], [`CgpaRequestQuery`], [`DashboardQuery`] and the
//! account ports) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod cgpa_request_command;
mod cgpa_request_query;
mod cgpa_request_repository;
mod dashboard_query;
mod decision_metrics;
mod login_service;
mod password_hasher;
mod user_repository;

pub use cgpa_request_command::{
    BulkDecisionCommand, BulkDecisionEntry, CgpaRequestCommand, DecisionCommand,
};
#[cfg(test)]
pub use cgpa_request_command::MockCgpaRequestCommand;
pub use cgpa_request_query::{CgpaRequestQuery, RequestView, UserSummary};
#[cfg(test)]
pub use cgpa_request_query::MockCgpaRequestQuery;
pub use cgpa_request_repository::{
    CgpaRequestRepository, CgpaRequestRepositoryError, DecisionOutcome, RequestFilter,
    TransitionGuard,
};
#[cfg(test)]
pub use cgpa_request_repository::MockCgpaRequestRepository;
pub use dashboard_query::{DashboardQuery, FacultyStats, StudentStats};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use decision_metrics::{
    DecisionMetrics, DecisionMetricsError, DecisionOutcomeKind, NoOpDecisionMetrics,
};
pub use login_service::{CurrentUserQuery, LoginService, RegistrationService};
#[cfg(test)]
pub use login_service::{MockCurrentUserQuery, MockLoginService, MockRegistrationService};
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
