//! # folio-store
//!
//! File-backed persistence for folio: the YAML manifest, one front-matter
//! file per document, and the repository that keeps the two in step.

pub mod file_storage;
pub mod front_matter;
pub mod manifest;
pub mod repository;

pub use file_storage::{DocumentFiles, FilesystemBackend, StorageBackend};
pub use manifest::ManifestFile;
pub use repository::DocumentRepository;

use std::path::PathBuf;

use folio_core::Result;

/// Open a repository over a manifest file and a documents directory.
///
/// The manifest must already exist unless `create_manifest` is set.
pub async fn open_repository(
    manifest_path: impl Into<PathBuf>,
    documents_dir: impl Into<PathBuf>,
    create_manifest: bool,
) -> Result<DocumentRepository> {
    let manifest = ManifestFile::new(manifest_path);
    if create_manifest {
        manifest.init_if_missing().await?;
    }
    let documents = DocumentFiles::new(FilesystemBackend::new(documents_dir));
    DocumentRepository::open(manifest, documents).await
}
