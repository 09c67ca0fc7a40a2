//! # Worker Configuration
//!
//! Command-line flags with environment-variable fallbacks. Every setting has
//! a default, so a bare `credential-ledger` starts a combined worker on port
//! 4000 backed by `credentials.json`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ledger_store::{BackendConfig, FileStoreOptions, SqlStoreOptions};

/// Which credential endpoints this worker serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ServiceRole {
    /// `POST /issue` only.
    Issuance,
    /// `POST /verify` only.
    Verification,
    /// Both endpoints.
    #[default]
    Combined,
}

impl ServiceRole {
    /// Whether `POST /issue` is mounted.
    pub fn serves_issuance(self) -> bool {
        matches!(self, Self::Issuance | Self::Combined)
    }

    /// Whether `POST /verify` is mounted.
    pub fn serves_verification(self) -> bool {
        matches!(self, Self::Verification | Self::Combined)
    }

    /// Lowercase name, as accepted by `--role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issuance => "issuance",
            Self::Verification => "verification",
            Self::Combined => "combined",
        }
    }
}

impl std::fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Single JSON file guarded by a lock file.
    File,
    /// SQLite database.
    Sqlite,
    /// Process memory; for development only.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Credential ledger worker.
#[derive(Debug, Clone, Parser)]
#[command(name = "credential-ledger", version, about)]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Endpoints to serve.
    #[arg(long, env = "LEDGER_ROLE", value_enum, default_value_t = ServiceRole::Combined)]
    pub role: ServiceRole,

    /// Ledger backend.
    #[arg(long, env = "LEDGER_BACKEND", value_enum, default_value_t = BackendKind::File)]
    pub backend: BackendKind,

    /// Ledger file for the `file` backend.
    #[arg(long, env = "LEDGER_FILE", default_value = "credentials.json")]
    pub ledger_file: PathBuf,

    /// Database URL for the `sqlite` backend.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://credential.db")]
    pub database_url: String,

    /// Issuer identity recorded on issued credentials. Defaults to
    /// `worker-<hostname>`.
    #[arg(long, env = "LEDGER_ISSUER_ID")]
    pub issuer_id: Option<String>,

    /// How long an insert waits for the ledger file lock, in milliseconds.
    #[arg(long, env = "LEDGER_LOCK_TIMEOUT_MS", default_value_t = 5000)]
    pub lock_timeout_ms: u64,

    /// Age after which a ledger lock file is presumed abandoned, in milliseconds.
    #[arg(long, env = "LEDGER_LOCK_STALE_MS", default_value_t = 30_000)]
    pub lock_stale_ms: u64,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// The store this worker should open.
    pub fn backend_config(&self) -> BackendConfig {
        match self.backend {
            BackendKind::File => BackendConfig::File {
                path: self.ledger_file.clone(),
                options: FileStoreOptions {
                    lock_timeout: Duration::from_millis(self.lock_timeout_ms),
                    lock_stale_after: Duration::from_millis(self.lock_stale_ms),
                },
            },
            BackendKind::Sqlite => BackendConfig::Sqlite {
                url: self.database_url.clone(),
                options: SqlStoreOptions::default(),
            },
            BackendKind::Memory => BackendConfig::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_mount_their_endpoints() {
        assert!(ServiceRole::Issuance.serves_issuance());
        assert!(!ServiceRole::Issuance.serves_verification());
        assert!(!ServiceRole::Verification.serves_issuance());
        assert!(ServiceRole::Verification.serves_verification());
        assert!(ServiceRole::Combined.serves_issuance());
        assert!(ServiceRole::Combined.serves_verification());
    }

    #[test]
    fn parses_explicit_flags() {
        let cli = Cli::try_parse_from([
            "credential-ledger",
            "--port",
            "5000",
            "--role",
            "verification",
            "--backend",
            "sqlite",
            "--database-url",
            "sqlite://ledger.db",
            "--issuer-id",
            "worker-fixed",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.port, 5000);
        assert_eq!(cli.role, ServiceRole::Verification);
        assert_eq!(cli.issuer_id.as_deref(), Some("worker-fixed"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(
            cli.backend_config(),
            BackendConfig::Sqlite { ref url, .. } if url == "sqlite://ledger.db"
        ));
    }

    #[test]
    fn file_backend_carries_lock_settings() {
        let cli = Cli::try_parse_from([
            "credential-ledger",
            "--backend",
            "file",
            "--ledger-file",
            "/var/lib/ledger/credentials.json",
            "--lock-timeout-ms",
            "250",
            "--lock-stale-ms",
            "1000",
        ])
        .unwrap();
        let BackendConfig::File { path, options } = cli.backend_config() else {
            panic!("expected file backend");
        };
        assert_eq!(path, PathBuf::from("/var/lib/ledger/credentials.json"));
        assert_eq!(options.lock_timeout, Duration::from_millis(250));
        assert_eq!(options.lock_stale_after, Duration::from_secs(1));
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(Cli::try_parse_from(["credential-ledger", "--role", "auditor"]).is_err());
    }
}
