//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented credential routes into one OpenAPI
//! document, served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the credential endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Credential Ledger API",
        description = "Idempotent credential issuance and verification backed by a shared ledger."
    ),
    paths(
        crate::routes::issue::issue_credential,
        crate::routes::verify::verify_credential,
    ),
    components(schemas(
        crate::routes::CredentialRequest,
        crate::routes::issue::IssueResponse,
        crate::routes::verify::VerifyResponse,
        crate::middleware::metrics::MetricsSnapshot,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "credentials", description = "Credential issuance and verification"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
