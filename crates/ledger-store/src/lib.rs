//! # ledger-store: Durable Credential Ledger
//!
//! The one stateful, shared component of the system. Every backend
//! implements [`LedgerStore`], whose `insert_if_absent` performs the
//! existence check and the write as a single atomic unit.
//!
//! ## Backends
//!
//! | Backend        | Mutual exclusion                               | Durable |
//! |----------------|-----------------------------------------------|---------|
//! | [`FileStore`]  | process mutex + `<ledger>.lock` lock file      | yes     |
//! | [`SqlStore`]   | `PRIMARY KEY` constraint on `credentials.id`   | yes     |
//! | [`MemoryStore`]| one `RwLock` write guard                       | no      |
//!
//! Backends are chosen once at startup through [`BackendConfig`] and
//! [`open`], and shared as `Arc<dyn LedgerStore>`.

pub mod backend;
pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod sql;

pub use backend::{InsertOutcome, LedgerStore};
pub use config::{open, BackendConfig};
pub use error::{StoreError, StoreResult};
pub use file::{FileStore, FileStoreOptions};
pub use memory::MemoryStore;
pub use sql::{SqlStore, SqlStoreOptions};
