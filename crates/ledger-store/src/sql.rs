//! Relational ledger backend (SQLite via SQLx).
//!
//! All records live in the `credentials` table, whose primary key on `id`
//! is the only guard against double issuance. `insert_if_absent` is a single
//! `INSERT … RETURNING` statement; a uniqueness violation is mapped to
//! [`InsertOutcome::AlreadyExists`]. There is no application-level lock and
//! no pre-check query.
//!
//! `issued_at` is filled in by the column default at insert time and stored
//! as RFC 3339 text with millisecond precision.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use ledger_core::{CredentialId, IssuanceMetadata, IssuerId, Record, Timestamp};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::backend::{InsertOutcome, LedgerStore};
use crate::error::{StoreError, StoreResult};

/// Connection settings for [`SqlStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStoreOptions {
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// How long to wait for a pooled connection.
    pub acquire_timeout: Duration,
}

impl Default for SqlStoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 8,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Ledger stored in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Connect to `url` (e.g. `sqlite://credential.db`), creating the
    /// database file if needed, and apply embedded migrations.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        Self::connect_with(url, SqlStoreOptions::default()).await
    }

    /// Connect with explicit pool settings.
    pub async fn connect_with(url: &str, options: SqlStoreOptions) -> StoreResult<Self> {
        let connect = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(options.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect)
            .await?;

        tracing::info!(url = %url, "connected to SQLite ledger");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and apply embedded migrations.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("ledger migrations applied");
        Ok(Self { pool })
    }

    /// Fetch a full record, including its payload.
    pub async fn get(&self, id: &CredentialId) -> StoreResult<Option<Record>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, payload, issuer_id, issued_at FROM credentials WHERE id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_record).transpose()
    }

    /// Number of records held.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM credentials")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for in-flight statements to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl LedgerStore for SqlStore {
    async fn insert_if_absent(
        &self,
        id: &CredentialId,
        payload: &str,
        issuer_id: &IssuerId,
    ) -> StoreResult<InsertOutcome> {
        let inserted = sqlx::query_scalar::<_, String>(
            "INSERT INTO credentials (id, payload, issuer_id) VALUES (?1, ?2, ?3)
             RETURNING issued_at",
        )
        .bind(id.as_str())
        .bind(payload)
        .bind(issuer_id.as_str())
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(issued_at) => Ok(InsertOutcome::Inserted(Record {
                id: id.clone(),
                payload: payload.to_owned(),
                issuer_id: issuer_id.clone(),
                issued_at: parse_issued_at(&issued_at)?,
            })),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tracing::debug!(credential_id = %id, "unique constraint rejected duplicate issuance");
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn lookup(&self, id: &CredentialId) -> StoreResult<Option<IssuanceMetadata>> {
        let row = sqlx::query_as::<_, MetadataRow>(
            "SELECT issuer_id, issued_at FROM credentials WHERE id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MetadataRow::into_metadata).transpose()
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

fn parse_issued_at(raw: &str) -> StoreResult<Timestamp> {
    Timestamp::parse(raw).map_err(|e| StoreError::Corrupt {
        reason: format!("issued_at {raw:?} is not RFC 3339: {e}"),
    })
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: String,
    payload: String,
    issuer_id: String,
    issued_at: String,
}

impl CredentialRow {
    fn into_record(self) -> StoreResult<Record> {
        let id = CredentialId::new(self.id).map_err(|e| StoreError::Corrupt {
            reason: format!("stored credential id is invalid: {e}"),
        })?;
        Ok(Record {
            id,
            payload: self.payload,
            issuer_id: IssuerId::new(self.issuer_id),
            issued_at: parse_issued_at(&self.issued_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MetadataRow {
    issuer_id: String,
    issued_at: String,
}

impl MetadataRow {
    fn into_metadata(self) -> StoreResult<IssuanceMetadata> {
        Ok(IssuanceMetadata {
            issuer_id: IssuerId::new(self.issuer_id),
            issued_at: parse_issued_at(&self.issued_at)?,
        })
    }
}
