//! # Request Body Extraction
//!
//! [`CredentialBody`] reads a `{ "credential": ... }` envelope straight from
//! the request bytes so the credential text reaches the ledger exactly as
//! sent. Every body-level failure (wrong content type, oversized or
//! unreadable body, malformed JSON) is rejected as [`AppError::InvalidInput`],
//! which renders as the ledger's own 400 response.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use ledger_core::CredentialEnvelope;

use crate::error::AppError;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A parsed, not yet validated, credential envelope.
#[derive(Debug)]
pub struct CredentialBody(pub CredentialEnvelope);

#[axum::async_trait]
impl<S: Send + Sync> FromRequest<S> for CredentialBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(AppError::InvalidInput(
                "expected request with `Content-Type: application/json`".into(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

        CredentialEnvelope::from_slice(&bytes)
            .map(CredentialBody)
            .map_err(AppError::from)
    }
}

/// `application/json` or any `application/*+json` media type.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}
