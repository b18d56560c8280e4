//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockCgpaRequestCommand, MockCgpaRequestQuery, MockCurrentUserQuery, MockDashboardQuery,
    MockLoginService, MockRegistrationService,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Session middleware with a throwaway key and an insecure `session` cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// One mock per driving port; unset expectations fail the test when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub current_user: MockCurrentUserQuery,
    pub requests: MockCgpaRequestCommand,
    pub requests_query: MockCgpaRequestQuery,
    pub dashboard: MockDashboardQuery,
}

impl From<MockPorts> for HttpState {
    fn from(ports: MockPorts) -> Self {
        Self {
            login: Arc::new(ports.login),
            registration: Arc::new(ports.registration),
            current_user: Arc::new(ports.current_user),
            requests: Arc::new(ports.requests),
            requests_query: Arc::new(ports.requests_query),
            dashboard: Arc::new(ports.dashboard),
        }
    }
}

const SIGN_IN_PATH: &str = "/__test/sign-in";

async fn force_sign_in(
    session: SessionContext,
    id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(id.into_inner())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// The full API over mocks, plus a route that signs in any user id.
pub fn portal_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::from(ports)))
        .wrap(test_session_middleware())
        .route(
            &format!("{SIGN_IN_PATH}/{{id}}"),
            web::post().to(force_sign_in),
        )
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Session cookie for `user_id`, obtained through the test sign-in route.
pub async fn signed_in<S>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "test sign-in failed");
    session_cookie(&res)
}
