//! OpenAPI document for the portal's REST API.
//!
//! [`ApiDoc`] collects every handler under `inbound::http` along with the
//! request and response bodies they exchange. Swagger UI serves it in debug
//! builds and `cargo run --bin openapi-dump` writes it out for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::cgpa_requests::SubmitCgpaRequest;
use crate::inbound::http::dto::{
    CgpaRequestResponse, DocumentDto, UserResponse, UserSummaryResponse,
};
use crate::inbound::http::faculty::{
    BulkDecisionRequest, BulkDecisionResponse, BulkDecisionResult, DecisionRequest,
    FacultyStatsResponse,
};
use crate::inbound::http::students::StudentStatsResponse;
use crate::inbound::http::validation::CgpaInput;

/// Register the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CGPA portal API",
        description = "Student CGPA update requests and their departmental review."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::cgpa_requests::submit_request,
        crate::inbound::http::cgpa_requests::my_requests,
        crate::inbound::http::faculty::queue,
        crate::inbound::http::faculty::decide,
        crate::inbound::http::faculty::bulk_decide,
        crate::inbound::http::faculty::stats,
        crate::inbound::http::students::my_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        UserSummaryResponse,
        SubmitCgpaRequest,
        CgpaInput,
        DocumentDto,
        CgpaRequestResponse,
        DecisionRequest,
        BulkDecisionRequest,
        BulkDecisionResult,
        BulkDecisionResponse,
        FacultyStatsResponse,
        StudentStatsResponse,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "users", description = "The signed-in account"),
        (name = "cgpa-requests", description = "Student CGPA update requests"),
        (name = "faculty", description = "Departmental review of requests"),
        (name = "students", description = "Student dashboard"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("UserResponse", &["id", "email", "role", "department", "cgpa"])]
    #[case(
        "CgpaRequestResponse",
        &["id", "studentId", "currentCgpa", "newCgpa", "semester", "status"]
    )]
    #[case("BulkDecisionResult", &["requestId", "ok", "request", "error"])]
    #[case(
        "FacultyStatsResponse",
        &["department", "totalStudents", "pendingApprovals", "departmentAverageCgpa"]
    )]
    fn schemas_expose_camel_case_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema"));

        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/cgpa-requests")]
    #[case("/api/v1/faculty/cgpa-requests/{id}/decision")]
    #[case("/api/v1/faculty/cgpa-requests/bulk-decision")]
    #[case("/api/v1/students/me/stats")]
    #[case("/health/ready")]
    fn document_lists_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
