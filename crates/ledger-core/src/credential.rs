//! # Submitted Credentials
//!
//! Turns the untyped `{ "credential": { "id": ..., ... } }` request body into
//! a typed [`SubmittedCredential`]. This is the only place the shape of a
//! credential is inspected; the ledger itself treats the payload as opaque.
//!
//! The credential is captured as a [`RawValue`], so the payload handed to
//! the ledger is the exact JSON text the caller sent. Key order, spacing,
//! and number formatting are preserved.

use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::ValidationError;
use crate::identity::CredentialId;

/// The request body accepted by both `/issue` and `/verify`.
#[derive(Debug, Deserialize)]
pub struct CredentialEnvelope {
    /// The submitted credential, captured verbatim.
    #[serde(default)]
    pub credential: Option<Box<RawValue>>,
}

impl CredentialEnvelope {
    /// Parse an envelope from raw request bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(|e| ValidationError::MalformedJson(e.to_string()))
    }

    /// Validate the envelope's credential.
    pub fn into_submitted(self) -> Result<SubmittedCredential, ValidationError> {
        let raw = self.credential.ok_or(ValidationError::MissingCredential)?;
        SubmittedCredential::from_raw(&raw)
    }
}

/// A credential that passed shape validation: a JSON object with a
/// non-empty string `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCredential {
    id: CredentialId,
    payload: String,
}

impl SubmittedCredential {
    /// Validate a credential given as JSON text. The text becomes the payload.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
        let id = credential_id_of(&value)?;
        Ok(Self {
            id,
            payload: text.to_owned(),
        })
    }

    /// Validate a credential captured as a raw JSON value.
    pub fn from_raw(raw: &RawValue) -> Result<Self, ValidationError> {
        Self::from_json(raw.get())
    }

    /// The credential's identifier.
    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    /// The credential's JSON text exactly as submitted.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

fn credential_id_of(value: &Value) -> Result<CredentialId, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
    match object.get("id") {
        None | Some(Value::Null) => Err(ValidationError::MissingId),
        Some(Value::String(id)) => CredentialId::new(id.as_str()),
        Some(_) => Err(ValidationError::IdNotString),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(body: &str) -> Result<SubmittedCredential, ValidationError> {
        CredentialEnvelope::from_slice(body.as_bytes())?.into_submitted()
    }

    #[test]
    fn accepts_object_with_string_id() {
        let cred = submit(r#"{"credential":{"id":"123","data":"x"}}"#).unwrap();
        assert_eq!(cred.id().as_str(), "123");
        assert_eq!(cred.payload(), r#"{"id":"123","data":"x"}"#);
    }

    #[test]
    fn payload_is_verbatim() {
        let body = r#"{"credential": { "data" : [1, 2.50],   "id": "a" }}"#;
        let cred = submit(body).unwrap();
        assert_eq!(cred.payload(), r#"{ "data" : [1, 2.50],   "id": "a" }"#);
    }

    #[test]
    fn rejects_missing_credential() {
        assert_eq!(submit(r#"{}"#), Err(ValidationError::MissingCredential));
        assert_eq!(
            submit(r#"{"credential":null}"#),
            Err(ValidationError::MissingCredential)
        );
    }

    #[test]
    fn rejects_missing_id() {
        assert_eq!(
            submit(r#"{"credential":{"data":"x"}}"#),
            Err(ValidationError::MissingId)
        );
        assert_eq!(
            submit(r#"{"credential":{"id":null}}"#),
            Err(ValidationError::MissingId)
        );
    }

    #[test]
    fn rejects_non_object_credential() {
        assert_eq!(
            submit(r#"{"credential":"123"}"#),
            Err(ValidationError::NotAnObject)
        );
        assert_eq!(
            submit(r#"{"credential":[{"id":"1"}]}"#),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn rejects_non_string_and_empty_ids() {
        assert_eq!(
            submit(r#"{"credential":{"id":123}}"#),
            Err(ValidationError::IdNotString)
        );
        assert_eq!(
            submit(r#"{"credential":{"id":""}}"#),
            Err(ValidationError::EmptyId)
        );
    }

    #[test]
    fn rejects_malformed_body() {
        assert!(matches!(
            CredentialEnvelope::from_slice(b"{not json"),
            Err(ValidationError::MalformedJson(_))
        ));
    }
}
