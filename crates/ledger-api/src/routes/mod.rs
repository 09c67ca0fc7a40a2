//! # API Route Modules
//!
//! - `issue`: `POST /issue`, records a credential exactly once.
//! - `verify`: `POST /verify`, reports who issued a credential and when.
//!
//! Both accept the same envelope, `{ "credential": { "id": "...", ... } }`.

use serde::Deserialize;
use utoipa::ToSchema;

pub mod issue;
pub mod verify;

/// Request body accepted by `/issue` and `/verify`.
///
/// Handlers deserialize [`ledger_core::CredentialEnvelope`] directly so the
/// credential text is kept verbatim; this type only documents the shape.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialRequest {
    /// Any JSON object with a non-empty string `id`.
    #[schema(value_type = Object, example = json!({"id": "123", "data": "x"}))]
    pub credential: serde_json::Value,
}
