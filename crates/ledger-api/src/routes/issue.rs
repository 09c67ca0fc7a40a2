//! # Credential Issuance
//!
//! `POST /issue` records the submitted credential under this worker's
//! identity. A second submission of the same id, from any worker, is a
//! conflict.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ledger_service::IssueOutcome;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::CredentialBody;
use crate::state::AppState;

/// Response from a successful issuance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueResponse {
    /// `Credential issued by <issuerId>`.
    pub message: String,
}

/// Build the issuance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/issue", post(issue_credential))
}

/// POST /issue: record a credential exactly once.
#[utoipa::path(
    post,
    path = "/issue",
    request_body = crate::routes::CredentialRequest,
    responses(
        (status = 201, description = "Credential issued", body = IssueResponse),
        (status = 400, description = "Malformed credential", body = crate::error::ErrorBody),
        (status = 409, description = "Credential already issued", body = crate::error::ErrorBody),
        (status = 500, description = "Ledger failure", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub async fn issue_credential(
    State(state): State<AppState>,
    CredentialBody(envelope): CredentialBody,
) -> Result<(StatusCode, Json<IssueResponse>), AppError> {
    match state.issuance.issue(envelope).await? {
        IssueOutcome::Issued(issuer_id) => Ok((
            StatusCode::CREATED,
            Json(IssueResponse {
                message: format!("Credential issued by {issuer_id}"),
            }),
        )),
        IssueOutcome::Conflict => Err(AppError::Conflict),
    }
}
