//! # Issuance Records
//!
//! A [`Record`] is the ledger's single unit of state: one per credential
//! identifier, created by an atomic insert and never mutated afterwards.
//!
//! The serialized form (used by the file backend) is
//! `{ "id", "payload", "issuerId", "issuedAt" }`. Files written by the
//! earlier Node.js services used `credential` and `workerId` for the payload
//! and issuer fields; those names are accepted as aliases on read.

use serde::{Deserialize, Serialize};

use crate::identity::{CredentialId, IssuerId};
use crate::temporal::Timestamp;

/// One issuance of one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Caller-supplied identifier, unique across the ledger.
    pub id: CredentialId,
    /// The submitted credential's JSON text, stored verbatim.
    #[serde(alias = "credential")]
    pub payload: String,
    /// Worker that performed the issuance.
    #[serde(alias = "workerId")]
    pub issuer_id: IssuerId,
    /// When the store accepted the insert.
    pub issued_at: Timestamp,
}

impl Record {
    /// Project the record onto the metadata returned by verification.
    pub fn metadata(&self) -> IssuanceMetadata {
        IssuanceMetadata {
            issuer_id: self.issuer_id.clone(),
            issued_at: self.issued_at,
        }
    }
}

/// Issuance metadata returned by a ledger lookup. Excludes the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceMetadata {
    /// Worker that performed the issuance.
    pub issuer_id: IssuerId,
    /// When the store accepted the insert.
    pub issued_at: Timestamp,
}
