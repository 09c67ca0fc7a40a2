//! # Issuance
//!
//! Records a submitted credential in the ledger exactly once. The existence
//! check and the write are delegated to
//! [`LedgerStore::insert_if_absent`], so two workers racing on the same id
//! cannot both succeed.

use std::sync::Arc;

use ledger_core::{CredentialEnvelope, IssuerId, SubmittedCredential};
use ledger_store::{InsertOutcome, LedgerStore};

use crate::error::ServiceError;

/// Result of an issuance request that reached the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// This worker recorded the credential.
    Issued(IssuerId),
    /// The credential was already on the ledger; nothing changed.
    Conflict,
}

/// Issues credentials on behalf of one worker.
#[derive(Clone)]
pub struct IssuanceService {
    store: Arc<dyn LedgerStore>,
    issuer_id: IssuerId,
}

impl std::fmt::Debug for IssuanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceService")
            .field("backend", &self.store.backend_name())
            .field("issuer_id", &self.issuer_id)
            .finish()
    }
}

impl IssuanceService {
    /// Create a service that issues as `issuer_id`.
    pub fn new(store: Arc<dyn LedgerStore>, issuer_id: IssuerId) -> Self {
        Self { store, issuer_id }
    }

    /// The identity recorded on every credential this service issues.
    pub fn issuer_id(&self) -> &IssuerId {
        &self.issuer_id
    }

    /// Validate a request envelope, then issue its credential.
    pub async fn issue(&self, envelope: CredentialEnvelope) -> Result<IssueOutcome, ServiceError> {
        let submitted = envelope.into_submitted()?;
        self.issue_credential(&submitted).await
    }

    /// Issue an already-validated credential.
    #[tracing::instrument(
        name = "issue",
        skip_all,
        fields(credential_id = %credential.id(), issuer_id = %self.issuer_id)
    )]
    pub async fn issue_credential(
        &self,
        credential: &SubmittedCredential,
    ) -> Result<IssueOutcome, ServiceError> {
        let outcome = self
            .store
            .insert_if_absent(credential.id(), credential.payload(), &self.issuer_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to record credential");
                e
            })?;

        match outcome {
            InsertOutcome::Inserted(record) => {
                tracing::info!(issued_at = %record.issued_at, "credential issued");
                Ok(IssueOutcome::Issued(record.issuer_id))
            }
            InsertOutcome::AlreadyExists => {
                tracing::info!("credential already issued");
                Ok(IssueOutcome::Conflict)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::CredentialId;
    use ledger_store::MemoryStore;

    fn envelope(body: &str) -> CredentialEnvelope {
        CredentialEnvelope::from_slice(body.as_bytes()).unwrap()
    }

    fn service(store: &MemoryStore) -> IssuanceService {
        IssuanceService::new(Arc::new(store.clone()), IssuerId::new("worker-test"))
    }

    #[tokio::test]
    async fn issues_then_conflicts() {
        let store = MemoryStore::new();
        let svc = service(&store);

        let first = svc
            .issue(envelope(r#"{"credential":{"id":"123","data":"x"}}"#))
            .await
            .unwrap();
        assert_eq!(first, IssueOutcome::Issued(IssuerId::new("worker-test")));

        let second = svc
            .issue(envelope(r#"{"credential":{"id":"123","data":"y"}}"#))
            .await
            .unwrap();
        assert_eq!(second, IssueOutcome::Conflict);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn stores_payload_verbatim() {
        let store = MemoryStore::new();
        let body = r#"{"credential":{ "z": 1,  "id": "v" }}"#;
        service(&store).issue(envelope(body)).await.unwrap();

        let record = store.get(&CredentialId::new("v").unwrap()).unwrap();
        assert_eq!(record.payload, r#"{ "z": 1,  "id": "v" }"#);
    }

    #[tokio::test]
    async fn invalid_input_leaves_store_empty() {
        let store = MemoryStore::new();
        let err = service(&store)
            .issue(envelope(r#"{"credential":{"data":"x"}}"#))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(store.is_empty());
    }
}
