//! Single-writer, file-backed ledger backend.
//!
//! The whole ledger is one JSON array on disk. Every `insert_if_absent`
//! runs the full read-modify-write cycle inside two nested exclusive
//! regions:
//!
//! 1. a `tokio::sync::Mutex` serializing tasks within this process, and
//! 2. a lock file (`<ledger>.lock`, created with create-new semantics)
//!    serializing processes that share the ledger file.
//!
//! New content is written to a uniquely named temporary file beside the
//! ledger, flushed, and renamed over it. The write, flush and rename run as
//! one blocking task that owns the lock file, so a caller that abandons an
//! insert mid-commit cannot release the lock before the rename lands, and
//! readers see either the old array or the new one.
//!
//! `lookup` takes neither lock. Records are immutable once written, so the
//! only staleness a reader can observe is missing an insert that has not
//! finished yet.
//!
//! Files written by the earlier Node.js services may hold elements whose
//! `id` is not a string (the old services accepted any truthy id). Such
//! elements never match a lookup and are carried through rewrites as-is.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ledger_core::{CredentialId, IssuanceMetadata, IssuerId, Record, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::backend::{InsertOutcome, LedgerStore};
use crate::error::{StoreError, StoreResult};

/// Interval between lock file acquisition attempts.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Tuning for the cross-process lock file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStoreOptions {
    /// How long an insert waits for another writer before failing.
    pub lock_timeout: Duration,
    /// Age after which an existing lock file is presumed abandoned.
    pub lock_stale_after: Duration,
}

impl Default for FileStoreOptions {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            lock_stale_after: Duration::from_secs(30),
        }
    }
}

/// Ledger stored as a JSON array in a single file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    writer: Mutex<()>,
    options: FileStoreOptions,
}

impl FileStore {
    /// Open a ledger at `path` with default lock settings.
    ///
    /// The file need not exist; a missing file is an empty ledger.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, FileStoreOptions::default())
    }

    /// Open a ledger at `path` with explicit lock settings.
    pub fn with_options(path: impl Into<PathBuf>, options: FileStoreOptions) -> Self {
        let path = path.into();
        Self {
            lock_path: sibling(&path, ".lock"),
            path,
            writer: Mutex::new(()),
            options,
        }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the cross-process lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Read every record in the ledger, including payloads.
    ///
    /// Legacy elements whose id is not a valid credential id are skipped.
    pub async fn read_records(&self) -> StoreResult<Vec<Record>> {
        let entries = self.read_entries().await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                LedgerEntry::Record(record) => Some(record),
                LedgerEntry::Foreign(_) => None,
            })
            .collect())
    }

    async fn read_entries(&self) -> StoreResult<Vec<LedgerEntry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::io(
                    format!("reading ledger {}", self.path.display()),
                    e,
                ))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let corrupt = |e: serde_json::Error| StoreError::Corrupt {
            reason: format!("{} is not a JSON array of records: {e}", self.path.display()),
        };
        let elements: Vec<Box<RawValue>> = serde_json::from_slice(&bytes).map_err(corrupt)?;
        elements
            .into_iter()
            .map(LedgerEntry::from_raw)
            .collect::<Result<_, _>>()
            .map_err(corrupt)
    }

    /// Write `entries` to a fresh temporary file and rename it over the
    /// ledger. `lock` is released only once the blocking commit has finished,
    /// whether or not the calling future is still alive.
    async fn commit(&self, entries: &[LedgerEntry], lock: LockFile) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let result = replace_file(&path, &bytes);
            drop(lock);
            result
        })
        .await
        .map_err(|e| StoreError::io("joining ledger writer", std::io::Error::other(e)))?
    }
}

/// One element of the on-disk array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LedgerEntry {
    Record(Record),
    /// Legacy element with a non-string or out-of-range id, kept verbatim.
    Foreign(Box<RawValue>),
}

/// The `id` of an element, whatever its JSON type.
#[derive(Deserialize)]
struct ElementId {
    #[serde(default)]
    id: Option<Value>,
}

impl LedgerEntry {
    fn from_raw(raw: Box<RawValue>) -> Result<Self, serde_json::Error> {
        let ElementId { id } = serde_json::from_str(raw.get())?;
        match id {
            Some(Value::String(id)) if CredentialId::new(id.as_str()).is_err() => {
                Ok(Self::Foreign(raw))
            }
            Some(Value::String(_)) | None => serde_json::from_str(raw.get()).map(Self::Record),
            Some(_) => Ok(Self::Foreign(raw)),
        }
    }

    fn record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Foreign(_) => None,
        }
    }
}

fn replace_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = parent_dir(path);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| StoreError::io(format!("creating temporary file in {}", dir.display()), e))?;
    let tmp_display = tmp.path().display().to_string();
    tmp.write_all(bytes)
        .map_err(|e| StoreError::io(format!("writing {tmp_display}"), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(format!("syncing {tmp_display}"), e))?;
    tmp.persist(path).map_err(|e| {
        StoreError::io(
            format!("replacing ledger {} with {tmp_display}", path.display()),
            e.error,
        )
    })?;
    Ok(())
}

#[async_trait]
impl LedgerStore for FileStore {
    async fn insert_if_absent(
        &self,
        id: &CredentialId,
        payload: &str,
        issuer_id: &IssuerId,
    ) -> StoreResult<InsertOutcome> {
        let _writer = self.writer.lock().await;
        let lock = LockFile::acquire(&self.lock_path, &self.options).await?;

        let mut entries = self.read_entries().await?;
        if entries.iter().filter_map(LedgerEntry::record).any(|r| &r.id == id) {
            tracing::debug!(credential_id = %id, "credential already present in ledger file");
            return Ok(InsertOutcome::AlreadyExists);
        }

        let record = Record {
            id: id.clone(),
            payload: payload.to_owned(),
            issuer_id: issuer_id.clone(),
            issued_at: Timestamp::now(),
        };
        entries.push(LedgerEntry::Record(record.clone()));
        self.commit(&entries, lock).await?;

        tracing::debug!(
            credential_id = %id,
            path = %self.path.display(),
            entries = entries.len(),
            "ledger file rewritten"
        );
        Ok(InsertOutcome::Inserted(record))
    }

    async fn lookup(&self, id: &CredentialId) -> StoreResult<Option<IssuanceMetadata>> {
        let entries = self.read_entries().await?;
        Ok(entries
            .iter()
            .filter_map(LedgerEntry::record)
            .find(|r| &r.id == id)
            .map(Record::metadata))
    }

    async fn health_check(&self) -> StoreResult<()> {
        let dir = parent_dir(&self.path);
        let meta = tokio::fs::metadata(dir)
            .await
            .map_err(|e| StoreError::io(format!("inspecting ledger directory {}", dir.display()), e))?;
        if !meta.is_dir() {
            return Err(StoreError::Corrupt {
                reason: format!("{} is not a directory", dir.display()),
            });
        }
        self.read_entries().await.map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Cross-process exclusive lock held for the lifetime of the value.
#[derive(Debug)]
struct LockFile {
    path: PathBuf,
}

impl LockFile {
    async fn acquire(path: &Path, options: &FileStoreOptions) -> StoreResult<Self> {
        let started = Instant::now();
        loop {
            let attempt = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .await;
            match attempt {
                Ok(mut file) => {
                    let owner = std::process::id().to_string();
                    if let Err(e) = file.write_all(owner.as_bytes()).await {
                        tracing::debug!(path = %path.display(), error = %e, "could not record lock owner");
                    }
                    return Ok(Self {
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if is_stale(path, options.lock_stale_after).await {
                        tracing::warn!(
                            path = %path.display(),
                            stale_after = ?options.lock_stale_after,
                            "removing abandoned ledger lock"
                        );
                        match tokio::fs::remove_file(path).await {
                            Ok(()) => continue,
                            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                            Err(e) => {
                                return Err(StoreError::io(
                                    format!("removing stale lock {}", path.display()),
                                    e,
                                ))
                            }
                        }
                    }
                    let waited = started.elapsed();
                    if waited >= options.lock_timeout {
                        return Err(StoreError::LockTimeout {
                            path: path.to_path_buf(),
                            waited,
                        });
                    }
                    tokio::time::sleep(LOCK_POLL_INTERVAL).await;
                }
                Err(e) => {
                    return Err(StoreError::io(
                        format!("creating lock {}", path.display()),
                        e,
                    ))
                }
            }
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to release ledger lock");
            }
        }
    }
}

async fn is_stale(path: &Path, stale_after: Duration) -> bool {
    match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
        Ok(modified) => modified
            .elapsed()
            .map(|age| age >= stale_after)
            .unwrap_or(false),
        Err(_) => false,
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
