//! Shared contract checks run against every [`LedgerStore`] backend.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use ledger_core::{CredentialId, IssuerId};
use ledger_store::{InsertOutcome, LedgerStore, SqlStore};
use tokio::task::JoinSet;

pub fn id(s: &str) -> CredentialId {
    CredentialId::new(s).expect("valid id")
}

pub async fn sqlite_store(dir: &tempfile::TempDir) -> SqlStore {
    let url = format!("sqlite://{}", dir.path().join("credential.db").display());
    SqlStore::connect(&url).await.expect("connect sqlite")
}

/// Issuing twice sequentially yields `Inserted` then `AlreadyExists`.
pub async fn sequential_insert_is_idempotent<S: LedgerStore>(store: &S) {
    let issuer = IssuerId::new("worker-one");
    let first = store
        .insert_if_absent(&id("seq"), r#"{"id":"seq"}"#, &issuer)
        .await
        .expect("first insert");
    assert!(first.is_inserted(), "first insert should win: {first:?}");

    let second = store
        .insert_if_absent(&id("seq"), r#"{"id":"seq","again":true}"#, &IssuerId::new("worker-two"))
        .await
        .expect("second insert");
    assert_eq!(second, InsertOutcome::AlreadyExists);

    let meta = store.lookup(&id("seq")).await.expect("lookup").expect("record present");
    assert_eq!(meta.issuer_id, issuer, "losing insert must not overwrite issuer");
}

/// Lookup returns exactly the metadata the winning insert recorded.
pub async fn lookup_returns_recorded_metadata<S: LedgerStore>(store: &S) {
    let outcome = store
        .insert_if_absent(&id("123"), r#"{"id":"123","data":"x"}"#, &IssuerId::new("worker-a"))
        .await
        .expect("insert");
    let InsertOutcome::Inserted(record) = outcome else {
        panic!("expected Inserted, got {outcome:?}");
    };
    let meta = store.lookup(&id("123")).await.expect("lookup");
    assert_eq!(meta, Some(record.metadata()));
}

/// An id never issued is not found.
pub async fn lookup_unknown_is_none<S: LedgerStore>(store: &S) {
    assert_eq!(store.lookup(&id("never-issued")).await.expect("lookup"), None);
}

/// Distinct ids do not interfere.
pub async fn distinct_ids_are_independent<S: LedgerStore>(store: &S) {
    let issuer = IssuerId::new("worker-a");
    for n in 0..5 {
        let outcome = store
            .insert_if_absent(&id(&format!("cred-{n}")), "{}", &issuer)
            .await
            .expect("insert");
        assert!(outcome.is_inserted());
    }
    for n in 0..5 {
        assert!(store.lookup(&id(&format!("cred-{n}"))).await.expect("lookup").is_some());
    }
}

/// The store's health check succeeds on a usable backend.
pub async fn health_check_passes<S: LedgerStore>(store: &S) {
    store.health_check().await.expect("healthy store");
}

/// `tasks` concurrent issuers of one id: exactly one wins.
pub async fn concurrent_inserts_have_one_winner(store: Arc<dyn LedgerStore>, tasks: usize) {
    let mut set = JoinSet::new();
    for task in 0..tasks {
        let store = Arc::clone(&store);
        set.spawn(async move {
            let issuer = IssuerId::new(format!("worker-{task}"));
            let payload = format!(r#"{{"id":"contested","task":{task}}}"#);
            let outcome = store
                .insert_if_absent(&id("contested"), &payload, &issuer)
                .await
                .expect("insert should not error");
            (task, outcome)
        });
    }

    let mut winners = Vec::new();
    let mut losers = 0;
    while let Some(joined) = set.join_next().await {
        let (task, outcome) = joined.expect("task should not panic");
        match outcome {
            InsertOutcome::Inserted(_) => winners.push(task),
            InsertOutcome::AlreadyExists => losers += 1,
        }
    }
    assert_eq!(winners.len(), 1, "exactly one winner expected, got {winners:?}");
    assert_eq!(losers, tasks - 1);

    let meta = store
        .lookup(&id("contested"))
        .await
        .expect("lookup")
        .expect("winner's record present");
    assert_eq!(meta.issuer_id.as_str(), format!("worker-{}", winners[0]));
}

/// Concurrent issuers of distinct ids all win; none is lost.
pub async fn concurrent_distinct_inserts_are_all_kept(store: Arc<dyn LedgerStore>, tasks: usize) {
    let mut set = JoinSet::new();
    for task in 0..tasks {
        let store = Arc::clone(&store);
        set.spawn(async move {
            let cred = id(&format!("parallel-{task}"));
            store
                .insert_if_absent(&cred, "{}", &IssuerId::new("worker"))
                .await
                .expect("insert")
        });
    }
    while let Some(joined) = set.join_next().await {
        assert!(joined.expect("task should not panic").is_inserted());
    }

    let mut found = HashSet::new();
    for task in 0..tasks {
        if store
            .lookup(&id(&format!("parallel-{task}")))
            .await
            .expect("lookup")
            .is_some()
        {
            found.insert(task);
        }
    }
    assert_eq!(found.len(), tasks, "lost updates detected");
}
