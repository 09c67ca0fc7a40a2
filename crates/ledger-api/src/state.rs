//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Every worker in a deployment shares the ledger;
//! nothing else is shared.

use std::sync::Arc;

use ledger_core::IssuerId;
use ledger_service::{IssuanceService, VerificationService};
use ledger_store::{LedgerStore, MemoryStore};

use crate::config::ServiceRole;

/// Settings the router needs at assembly time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppConfig {
    /// Which credential endpoints to mount.
    pub role: ServiceRole,
}

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Issues credentials as this worker.
    pub issuance: IssuanceService,
    /// Reads issuance metadata.
    pub verification: VerificationService,
    /// The ledger itself, for readiness probing.
    pub store: Arc<dyn LedgerStore>,
    /// Router settings.
    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("issuance", &self.issuance)
            .field("backend", &self.store.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// Build state over `store`, issuing as `issuer_id`.
    pub fn new(store: Arc<dyn LedgerStore>, issuer_id: IssuerId, config: AppConfig) -> Self {
        Self {
            issuance: IssuanceService::new(Arc::clone(&store), issuer_id),
            verification: VerificationService::new(Arc::clone(&store)),
            store,
            config,
        }
    }

    /// Combined worker over a fresh in-memory ledger.
    pub fn in_memory(issuer_id: IssuerId) -> Self {
        Self::new(Arc::new(MemoryStore::new()), issuer_id, AppConfig::default())
    }
}
