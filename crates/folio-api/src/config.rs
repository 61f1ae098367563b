//! Server configuration read from the environment.
//!
//! `.env` is loaded by the binary before `ServerConfig::from_env` runs.
//!
//! | Variable               | Default          |
//! |------------------------|------------------|
//! | `HOST`                 | `0.0.0.0`        |
//! | `PORT`                 | `8000`           |
//! | `FOLIO_MANIFEST_PATH`  | `manifest.yaml`  |
//! | `FOLIO_DOCUMENTS_DIR`  | `documents`      |
//! | `FOLIO_INIT_MANIFEST`  | `false`          |
//! | `FOLIO_WRITE_TOKEN`    | unset            |
//! | `ALLOWED_ORIGINS`      | `*`              |
//! | `MAX_BODY_BYTES`       | `10485760`       |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use folio_core::{defaults, Error, Result};
use tracing::warn;

/// Everything the HTTP layer needs besides the repository.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Shared secret for create requests. `None` disables the check.
    pub write_token: Option<String>,
    /// Comma-separated origins, or `*` for any.
    pub allowed_origins: String,
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            write_token: None,
            allowed_origins: defaults::ALLOWED_ORIGINS.to_string(),
            max_body_bytes: defaults::MAX_BODY_BYTES,
        }
    }
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub manifest_path: PathBuf,
    pub documents_dir: PathBuf,
    /// Write an empty manifest at startup if none exists.
    pub init_manifest: bool,
    pub http: HttpConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let write_token = lookup("FOLIO_WRITE_TOKEN").filter(|t| !t.trim().is_empty());

        Self {
            host: lookup("HOST").unwrap_or_else(|| defaults::HOST.to_string()),
            port: parse_or("PORT", lookup("PORT"), defaults::PORT),
            manifest_path: lookup("FOLIO_MANIFEST_PATH")
                .unwrap_or_else(|| defaults::MANIFEST_PATH.to_string())
                .into(),
            documents_dir: lookup("FOLIO_DOCUMENTS_DIR")
                .unwrap_or_else(|| defaults::DOCUMENTS_DIR.to_string())
                .into(),
            init_manifest: lookup("FOLIO_INIT_MANIFEST")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            http: HttpConfig {
                write_token,
                allowed_origins: lookup("ALLOWED_ORIGINS")
                    .unwrap_or_else(|| defaults::ALLOWED_ORIGINS.to_string()),
                max_body_bytes: parse_or(
                    "MAX_BODY_BYTES",
                    lookup("MAX_BODY_BYTES"),
                    defaults::MAX_BODY_BYTES,
                ),
            },
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid HOST/PORT '{}:{}': {}", self.host, self.port, e)))
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Invalid config value, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.manifest_path, PathBuf::from("manifest.yaml"));
        assert_eq!(cfg.documents_dir, PathBuf::from("documents"));
        assert!(!cfg.init_manifest);
        assert!(cfg.http.write_token.is_none());
        assert_eq!(cfg.http.allowed_origins, "*");
        assert_eq!(cfg.http.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9100"),
            ("FOLIO_MANIFEST_PATH", "/srv/folio/manifest.yaml"),
            ("FOLIO_DOCUMENTS_DIR", "/srv/folio/docs"),
            ("FOLIO_INIT_MANIFEST", "1"),
            ("FOLIO_WRITE_TOKEN", "s3cret"),
            ("ALLOWED_ORIGINS", "https://a.example"),
        ]);
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:9100");
        assert_eq!(cfg.documents_dir, PathBuf::from("/srv/folio/docs"));
        assert!(cfg.init_manifest);
        assert_eq!(cfg.http.write_token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.http.allowed_origins, "https://a.example");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = config(&[("PORT", "eighty"), ("MAX_BODY_BYTES", "-1")]);
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.http.max_body_bytes, defaults::MAX_BODY_BYTES);
    }

    #[test]
    fn test_blank_token_disables_check() {
        let cfg = config(&[("FOLIO_WRITE_TOKEN", "  ")]);
        assert!(cfg.http.write_token.is_none());
    }

    #[test]
    fn test_bad_host_is_config_error() {
        let cfg = config(&[("HOST", "not a host")]);
        assert!(matches!(cfg.socket_addr(), Err(Error::Config(_))));
    }
}
