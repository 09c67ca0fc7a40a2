//! # Identity Newtypes
//!
//! [`CredentialId`] is the caller-supplied key of the ledger and validates
//! its format at construction time. [`IssuerId`] names the worker process
//! that recorded an issuance.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Upper bound on the byte length of a credential identifier.
pub const MAX_CREDENTIAL_ID_LEN: usize = 1024;

/// The caller-supplied identifier of a credential.
///
/// Non-empty and at most [`MAX_CREDENTIAL_ID_LEN`] bytes. Compared
/// byte-for-byte: no trimming or case folding is applied, so `"abc"` and
/// `" abc"` are distinct credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialId(String);

impl CredentialId {
    /// Create a credential identifier, validating its length.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if id.len() > MAX_CREDENTIAL_ID_LEN {
            return Err(ValidationError::IdTooLong {
                len: id.len(),
                max: MAX_CREDENTIAL_ID_LEN,
            });
        }
        Ok(Self(id))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CredentialId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CredentialId> for String {
    fn from(id: CredentialId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the worker process that performed an issuance.
///
/// Derived from the host name as `worker-<hostname>` unless an explicit
/// identity is configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerId(String);

impl IssuerId {
    /// Wrap an explicit issuer identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the issuer identity for a host: `worker-<hostname>`.
    pub fn for_host(hostname: &str) -> Self {
        Self(format!("worker-{hostname}"))
    }

    /// Access the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
