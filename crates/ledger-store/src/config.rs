//! Backend selection at startup.
//!
//! The binary decides which medium backs the ledger once, from
//! configuration, and hands every service the same `Arc<dyn LedgerStore>`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::LedgerStore;
use crate::error::StoreResult;
use crate::file::{FileStore, FileStoreOptions};
use crate::memory::MemoryStore;
use crate::sql::{SqlStore, SqlStoreOptions};

/// Which backend to open, with its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// JSON file with a single-writer lock.
    File {
        /// Ledger file path.
        path: PathBuf,
        /// Lock tuning.
        options: FileStoreOptions,
    },
    /// SQLite database.
    Sqlite {
        /// Connection URL, e.g. `sqlite://credential.db`.
        url: String,
        /// Pool tuning.
        options: SqlStoreOptions,
    },
    /// Process memory; lost on exit.
    Memory,
}

/// Open the configured backend.
pub async fn open(config: &BackendConfig) -> StoreResult<Arc<dyn LedgerStore>> {
    let store: Arc<dyn LedgerStore> = match config {
        BackendConfig::File { path, options } => {
            tracing::info!(path = %path.display(), "using file-backed ledger");
            Arc::new(FileStore::with_options(path.clone(), *options))
        }
        BackendConfig::Sqlite { url, options } => {
            Arc::new(SqlStore::connect_with(url, options.clone()).await?)
        }
        BackendConfig::Memory => {
            tracing::warn!("using in-memory ledger; issued credentials will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_each_backend() {
        let dir = tempfile::tempdir().unwrap();

        let file = open(&BackendConfig::File {
            path: dir.path().join("credentials.json"),
            options: FileStoreOptions::default(),
        })
        .await
        .unwrap();
        assert_eq!(file.backend_name(), "file");

        let sqlite = open(&BackendConfig::Sqlite {
            url: format!("sqlite://{}", dir.path().join("credential.db").display()),
            options: SqlStoreOptions::default(),
        })
        .await
        .unwrap();
        assert_eq!(sqlite.backend_name(), "sqlite");

        let memory = open(&BackendConfig::Memory).await.unwrap();
        assert_eq!(memory.backend_name(), "memory");
    }
}
