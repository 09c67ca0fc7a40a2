//! Ledger store trait definition.
//!
//! [`LedgerStore`] is the contract every durable medium implements. It has
//! exactly two data operations, and the atomicity requirement lives in the
//! first one:
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`insert_if_absent`](LedgerStore::insert_if_absent) | Existence check and insert as one atomic unit |
//! | [`lookup`](LedgerStore::lookup) | Read issuance metadata for an id |
//! | [`health_check`](LedgerStore::health_check) | Cheap readiness check |
//!
//! The trait exposes no separate existence check.

use async_trait::async_trait;
use ledger_core::{CredentialId, IssuanceMetadata, IssuerId, Record};

use crate::error::StoreResult;

/// Outcome of [`LedgerStore::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The id was absent; this record is now in the ledger.
    Inserted(Record),
    /// A record with this id already existed. Nothing was written.
    AlreadyExists,
}

impl InsertOutcome {
    /// Whether this call created the record.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Durable, concurrency-safe keeper of issuance records.
///
/// Implementations must be `Send + Sync` so one instance can be shared
/// across request handlers behind an `Arc`.
///
/// # Linearizability
///
/// For a fixed id, concurrent `insert_if_absent` calls behave as if
/// executed one at a time: exactly one returns
/// [`InsertOutcome::Inserted`], all others return
/// [`InsertOutcome::AlreadyExists`], and every `lookup` that starts after
/// the winning insert completes observes the record.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Record a first issuance of `id`, or report that one already exists.
    ///
    /// `issued_at` is assigned by the store. On `Err`, the ledger is
    /// unchanged and no partial record is observable.
    async fn insert_if_absent(
        &self,
        id: &CredentialId,
        payload: &str,
        issuer_id: &IssuerId,
    ) -> StoreResult<InsertOutcome>;

    /// Look up the issuance metadata for `id`. `Ok(None)` if never issued.
    async fn lookup(&self, id: &CredentialId) -> StoreResult<Option<IssuanceMetadata>>;

    /// Verify the backing medium is reachable and readable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
