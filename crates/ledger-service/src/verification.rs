//! Verification: reports who issued a credential and when.

use std::sync::Arc;

use ledger_core::{CredentialEnvelope, IssuanceMetadata, SubmittedCredential};
use ledger_store::LedgerStore;

use crate::error::ServiceError;

/// Result of a verification request that reached the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The credential is on the ledger.
    Verified(IssuanceMetadata),
    /// No credential with that id has been issued.
    NotFound,
}

/// Looks credentials up on the ledger.
#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn LedgerStore>,
}

impl std::fmt::Debug for VerificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationService")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl VerificationService {
    /// Create a service reading from `store`.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Validate a request envelope, then verify its credential.
    pub async fn verify(&self, envelope: CredentialEnvelope) -> Result<VerifyOutcome, ServiceError> {
        let submitted = envelope.into_submitted()?;
        self.verify_credential(&submitted).await
    }

    /// Verify an already-validated credential. Only its id is consulted.
    #[tracing::instrument(name = "verify", skip_all, fields(credential_id = %credential.id()))]
    pub async fn verify_credential(
        &self,
        credential: &SubmittedCredential,
    ) -> Result<VerifyOutcome, ServiceError> {
        let found = self.store.lookup(credential.id()).await.map_err(|e| {
            tracing::error!(error = %e, "failed to look up credential");
            e
        })?;

        Ok(match found {
            Some(metadata) => {
                tracing::info!(issuer_id = %metadata.issuer_id, "credential verified");
                VerifyOutcome::Verified(metadata)
            }
            None => {
                tracing::info!("credential not found");
                VerifyOutcome::NotFound
            }
        })
    }
}
