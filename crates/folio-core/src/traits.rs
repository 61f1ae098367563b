//! Core traits for folio persistence.
//!
//! The reconciliation logic in `folio-store` is written against these so the
//! manifest and document backends can be swapped (and made to fail) in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Document, Metadata};

// =============================================================================
// MANIFEST
// =============================================================================

/// Wholesale load/save of the metadata manifest.
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Read and decode every record. Fails if the manifest is absent or malformed.
    async fn load(&self) -> Result<Vec<Metadata>>;

    /// Replace the persisted manifest with `records`.
    async fn save(&self, records: &[Metadata]) -> Result<()>;
}

// =============================================================================
// DOCUMENT BODIES
// =============================================================================

/// Per-document persistence keyed by `fileName`.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Read the stored body for `metadata.file_name` and combine it with `metadata`.
    ///
    /// Returns `Error::DocumentNotFound` when no file exists for the name.
    async fn fetch_document(&self, metadata: &Metadata) -> Result<Document>;

    /// Persist the full document, overwriting any previous body.
    async fn write_document(&self, document: &Document) -> Result<()>;

    /// Raw stored bytes, or `None` when nothing is stored under `file_name`.
    async fn read_raw(&self, file_name: &str) -> Result<Option<Vec<u8>>>;

    /// Put raw bytes back under `file_name`.
    async fn restore_raw(&self, file_name: &str, data: &[u8]) -> Result<()>;

    /// Remove the stored body. Missing files are not an error.
    async fn delete_document(&self, file_name: &str) -> Result<()>;
}
