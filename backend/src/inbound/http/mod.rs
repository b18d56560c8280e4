//! HTTP inbound adapter exposing the portal's REST endpoints.

use actix_web::web;

pub mod accounts;
pub mod cgpa_requests;
pub mod dto;
pub mod error;
pub mod faculty;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Mount inside a scope so the paths line up with the OpenAPI document:
///
/// ```
/// use actix_web::{App, web};
/// use cgpa_portal::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(cgpa_requests::my_requests)
        .service(cgpa_requests::submit_request)
        .service(faculty::queue)
        .service(faculty::decide)
        .service(faculty::bulk_decide)
        .service(faculty::stats)
        .service(students::my_stats);
}
