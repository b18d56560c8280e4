//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CgpaRequestCommand, CgpaRequestQuery, CurrentUserQuery, DashboardQuery, LoginService,
    RegistrationService,
};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub current_user: Arc<dyn CurrentUserQuery>,
    pub requests: Arc<dyn CgpaRequestCommand>,
    pub requests_query: Arc<dyn CgpaRequestQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
}

impl HttpState {
    /// Bundle an account service, a workflow service, and a dashboard service.
    ///
    /// Each argument may implement several ports; the account service is
    /// shared by login, registration, and current-user lookups.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cgpa_portal::domain::{AccountService, CgpaWorkflowService, DashboardService};
    /// use cgpa_portal::inbound::http::state::HttpState;
    /// use cgpa_portal::outbound::memory::InMemoryStore;
    /// use cgpa_portal::outbound::security::Argon2PasswordHasher;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(mockable::DefaultClock);
    /// let state = HttpState::new(
    ///     Arc::new(AccountService::new(
    ///         store.clone(),
    ///         Arc::new(Argon2PasswordHasher),
    ///         clock.clone(),
    ///     )),
    ///     Arc::new(CgpaWorkflowService::new(store.clone(), store.clone(), clock)),
    ///     Arc::new(DashboardService::new(store.clone(), store)),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new<A, W, D>(accounts: Arc<A>, workflow: Arc<W>, dashboard: Arc<D>) -> Self
    where
        A: LoginService + RegistrationService + CurrentUserQuery + 'static,
        W: CgpaRequestCommand + CgpaRequestQuery + 'static,
        D: DashboardQuery + 'static,
    {
        Self {
            login: accounts.clone(),
            registration: accounts.clone(),
            current_user: accounts,
            requests: workflow.clone(),
            requests_query: workflow,
            dashboard,
        }
    }
}
