//! Host identity.
//!
//! A worker identifies itself as `worker-<hostname>`. The hostname comes from
//! the `HOSTNAME` environment variable, then `/etc/hostname`, then the
//! literal `unknown`.

use ledger_core::IssuerId;

const HOSTNAME_FILE: &str = "/etc/hostname";
const UNKNOWN_HOST: &str = "unknown";

/// The current host's name.
pub fn hostname() -> String {
    pick_hostname(
        std::env::var("HOSTNAME").ok(),
        std::fs::read_to_string(HOSTNAME_FILE).ok(),
    )
}

/// The issuer id for this process: `configured` if given, otherwise
/// `worker-<hostname>`.
pub fn resolve_issuer_id(configured: Option<&str>) -> IssuerId {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => IssuerId::new(id),
        None => IssuerId::for_host(&hostname()),
    }
}

fn pick_hostname(from_env: Option<String>, from_file: Option<String>) -> String {
    [from_env, from_file]
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_owned())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_HOST.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_takes_precedence_over_file() {
        let name = pick_hostname(Some("pod-7".into()), Some("box\n".into()));
        assert_eq!(name, "pod-7");
    }

    #[test]
    fn falls_back_to_file_then_unknown() {
        assert_eq!(pick_hostname(None, Some("box\n".into())), "box");
        assert_eq!(pick_hostname(Some("  ".into()), Some("box".into())), "box");
        assert_eq!(pick_hostname(None, None), "unknown");
        assert_eq!(pick_hostname(Some(String::new()), Some("\n".into())), "unknown");
    }

    #[test]
    fn configured_issuer_overrides_host() {
        assert_eq!(resolve_issuer_id(Some("worker-fixed")).as_str(), "worker-fixed");
    }

    #[test]
    fn default_issuer_is_worker_prefixed() {
        assert!(resolve_issuer_id(None).as_str().starts_with("worker-"));
        assert!(resolve_issuer_id(Some("   ")).as_str().starts_with("worker-"));
    }
}
