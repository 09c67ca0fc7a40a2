//! In-memory ledger backend.
//!
//! Thread-safe, cloneable map from credential id to [`Record`]. All
//! operations are synchronous under a `parking_lot::RwLock` (never held
//! across an `.await`), and the existence check and insert happen under one
//! write guard. Not durable; intended for development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ledger_core::{CredentialId, IssuanceMetadata, IssuerId, Record, Timestamp};
use parking_lot::RwLock;

use crate::backend::{InsertOutcome, LedgerStore};
use crate::error::StoreResult;

/// Non-durable ledger held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<CredentialId, Record>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a full record, including its payload.
    pub fn get(&self, id: &CredentialId) -> Option<Record> {
        self.records.read().get(id).cloned()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_if_absent(
        &self,
        id: &CredentialId,
        payload: &str,
        issuer_id: &IssuerId,
    ) -> StoreResult<InsertOutcome> {
        let mut guard = self.records.write();
        if guard.contains_key(id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        let record = Record {
            id: id.clone(),
            payload: payload.to_owned(),
            issuer_id: issuer_id.clone(),
            issued_at: Timestamp::now(),
        };
        guard.insert(id.clone(), record.clone());
        Ok(InsertOutcome::Inserted(record))
    }

    async fn lookup(&self, id: &CredentialId) -> StoreResult<Option<IssuanceMetadata>> {
        Ok(self.records.read().get(id).map(Record::metadata))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CredentialId {
        CredentialId::new(s).unwrap()
    }

    #[tokio::test]
    async fn second_insert_reports_already_exists() {
        let store = MemoryStore::new();
        let issuer = IssuerId::new("worker-a");
        let first = store.insert_if_absent(&id("1"), "{}", &issuer).await.unwrap();
        assert!(first.is_inserted());
        let second = store
            .insert_if_absent(&id("1"), r#"{"other":true}"#, &IssuerId::new("worker-b"))
            .await
            .unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id("1")).unwrap().issuer_id, issuer);
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store
            .insert_if_absent(&id("shared"), "{}", &IssuerId::new("w"))
            .await
            .unwrap();
        assert!(clone.lookup(&id("shared")).await.unwrap().is_some());
    }
}
