//! # Credential Verification
//!
//! `POST /verify` looks a credential up by id and reports the issuing worker
//! and issuance time. Only the id of the submitted credential is consulted.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use ledger_service::VerifyOutcome;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::CredentialBody;
use crate::state::AppState;

/// Issuance metadata for a verified credential.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Identity of the worker that issued the credential.
    pub worker_id: String,
    /// Issuance time, RFC 3339 with millisecond precision.
    pub issued_at: String,
}

/// Build the verification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/verify", post(verify_credential))
}

/// POST /verify: report who issued a credential and when.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = crate::routes::CredentialRequest,
    responses(
        (status = 200, description = "Credential verified", body = VerifyResponse),
        (status = 400, description = "Malformed credential", body = crate::error::ErrorBody),
        (status = 404, description = "Credential not found", body = crate::error::ErrorBody),
        (status = 500, description = "Ledger failure", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub async fn verify_credential(
    State(state): State<AppState>,
    CredentialBody(envelope): CredentialBody,
) -> Result<Json<VerifyResponse>, AppError> {
    match state.verification.verify(envelope).await? {
        VerifyOutcome::Verified(metadata) => Ok(Json(VerifyResponse {
            worker_id: metadata.issuer_id.to_string(),
            issued_at: metadata.issued_at.to_rfc3339(),
        })),
        VerifyOutcome::NotFound => Err(AppError::NotFound),
    }
}
