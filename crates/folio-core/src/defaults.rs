//! Centralized default constants for folio.
//!
//! Server configuration falls back to these when the matching environment
//! variable is unset or invalid.

// =============================================================================
// SERVER
// =============================================================================

/// Bind address.
pub const HOST: &str = "0.0.0.0";

/// Listen port.
pub const PORT: u16 = 8000;

/// Request body limit (10 MiB).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Origins allowed by CORS. `*` means any origin.
pub const ALLOWED_ORIGINS: &str = "*";

// =============================================================================
// STORAGE
// =============================================================================

/// Manifest file path.
pub const MANIFEST_PATH: &str = "manifest.yaml";

/// Directory holding one file per document.
pub const DOCUMENTS_DIR: &str = "documents";

/// Longest accepted `fileName`, in bytes (common filesystem limit).
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Delimiter line around a document's YAML front matter.
pub const FRONT_MATTER_DELIMITER: &str = "---";

// =============================================================================
// LOGGING
// =============================================================================

/// Default `RUST_LOG` filter.
pub const LOG_FILTER: &str = "folio_api=debug,folio_store=debug,tower_http=debug";

/// Log file name used when `LOG_FILE` points at a directory-less name.
pub const LOG_FILE_NAME: &str = "folio-api.log";
