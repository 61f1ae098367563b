//! Document file storage.
//!
//! One file per document, named by its `fileName`, holding YAML front matter
//! followed by the content. Writes are atomic (temp file + rename) so a reader
//! never observes a half-written body.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_store::file_storage::{DocumentFiles, FilesystemBackend};
//!
//! let files = DocumentFiles::new(FilesystemBackend::new("/var/folio/documents"));
//! files.write_document(&document).await?;
//! let doc = files.fetch_document(&document.metadata).await?;
//! ```

use async_trait::async_trait;
use folio_core::{Document, DocumentStorage, Error, Metadata, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::front_matter;

/// Storage backend trait for different storage implementations.
///
/// Paths are relative to the backend's root.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data to the specified path.
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read data from the specified path.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete data at the specified path.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Filesystem storage backend rooted at a single directory.
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    /// Validate that the storage directory can be written, read, and cleaned up.
    ///
    /// Run at startup to surface permission or missing-mount problems before
    /// the first request does.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_file = self.base_path.join(".health-check");

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", self.base_path, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        debug!(storage_path = %path, full_path = %full_path.display(), size = data.len(), "file_storage: write");
        write_atomic(&full_path, data).await
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path);
        Ok(fs::read(full_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.full_path(path);
        match fs::remove_file(full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `data` to `full_path` via a sibling temp file and rename.
///
/// Parent directories are created as needed.
pub(crate) async fn write_atomic(full_path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = full_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "file_storage: create_dir_all failed");
                e
            })?;
        }
    }

    let temp_path = temp_path_for(full_path);
    let mut file = fs::File::create(&temp_path).await.map_err(|e| {
        warn!(temp_path = %temp_path.display(), error = %e, "file_storage: File::create failed");
        e
    })?;
    file.write_all(data).await.map_err(|e| {
        warn!(error = %e, "file_storage: write_all failed");
        e
    })?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, full_path).await.map_err(|e| {
        warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "file_storage: rename failed");
        e
    })?;

    Ok(())
}

/// `notes.md` -> `notes.md.tmp`, keeping the original extension visible.
fn temp_path_for(full_path: &Path) -> PathBuf {
    let mut name = full_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    full_path.with_file_name(name)
}

/// Document bodies stored through a [`StorageBackend`], one file per `fileName`.
pub struct DocumentFiles {
    backend: Box<dyn StorageBackend>,
}

impl DocumentFiles {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Read a file, mapping "no such file" to `None`.
    async fn read_if_present(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        match self.backend.read(file_name).await {
            Ok(data) => Ok(Some(data)),
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl DocumentStorage for DocumentFiles {
    async fn fetch_document(&self, metadata: &Metadata) -> Result<Document> {
        let file_name = metadata.file_name.as_str();
        let Some(raw) = self.read_if_present(file_name).await? else {
            warn!(file_name, document_id = %metadata.id, "Manifest entry has no document file");
            return Err(Error::DocumentNotFound(file_name.to_string()));
        };
        let text = String::from_utf8(raw).map_err(|e| {
            Error::Serialization(format!("document '{}' is not UTF-8: {}", file_name, e))
        })?;
        let (_, content) = front_matter::parse(&text);

        Ok(Document::new(metadata.clone(), content))
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        let text = front_matter::render(document)?;
        self.backend
            .write(document.file_name(), text.as_bytes())
            .await
    }

    async fn read_raw(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        self.read_if_present(file_name).await
    }

    async fn restore_raw(&self, file_name: &str, data: &[u8]) -> Result<()> {
        self.backend.write(file_name, data).await
    }

    async fn delete_document(&self, file_name: &str) -> Result<()> {
        self.backend.delete(file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn doc(file_name: &str, content: &str) -> Document {
        Document::new(Metadata::new("d1", file_name), content)
    }

    #[tokio::test]
    async fn test_write_then_fetch_returns_content() {
        let dir = tempdir().unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));

        let d = doc("x.md", "hello");
        files.write_document(&d).await.unwrap();

        let fetched = files.fetch_document(&d.metadata).await.unwrap();
        assert_eq!(fetched.content, "hello");
        assert_eq!(fetched.metadata, d.metadata);
    }

    #[tokio::test]
    async fn test_fetch_uses_given_metadata() {
        let dir = tempdir().unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));
        files.write_document(&doc("x.md", "body")).await.unwrap();

        let mut newer = Metadata::new("d1", "x.md");
        newer.title = Some("Renamed".to_string());
        let fetched = files.fetch_document(&newer).await.unwrap();
        assert_eq!(fetched.metadata.title.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_document_not_found() {
        let dir = tempdir().unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));

        let err = files
            .fetch_document(&Metadata::new("d1", "missing.md"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(name) if name == "missing.md"));
    }

    #[tokio::test]
    async fn test_write_overwrites_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));

        files.write_document(&doc("x.md", "one")).await.unwrap();
        files.write_document(&doc("x.md", "two")).await.unwrap();

        let fetched = files
            .fetch_document(&Metadata::new("d1", "x.md"))
            .await
            .unwrap();
        assert_eq!(fetched.content, "two");
        assert!(!dir.path().join("x.md.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("docs");
        let files = DocumentFiles::new(FilesystemBackend::new(&root));

        files.write_document(&doc("x.md", "hi")).await.unwrap();
        assert!(root.join("x.md").exists());
    }

    #[tokio::test]
    async fn test_hand_written_file_without_front_matter() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("plain.md"), "no header").unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));

        let fetched = files
            .fetch_document(&Metadata::new("p", "plain.md"))
            .await
            .unwrap();
        assert_eq!(fetched.content, "no header");
    }

    #[tokio::test]
    async fn test_hand_written_file_with_foreign_front_matter() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("post.md"),
            "---\ntitle: Hello\nlayout: post\n---\nbody",
        )
        .unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));

        let meta = Metadata::new("p", "post.md");
        let fetched = files.fetch_document(&meta).await.unwrap();
        assert_eq!(fetched.content, "body");
        assert_eq!(fetched.metadata, meta);
    }

    #[tokio::test]
    async fn test_raw_restore_and_delete() {
        let dir = tempdir().unwrap();
        let files = DocumentFiles::new(FilesystemBackend::new(dir.path()));

        assert!(files.read_raw("x.md").await.unwrap().is_none());
        files.restore_raw("x.md", b"raw bytes").await.unwrap();
        assert_eq!(files.read_raw("x.md").await.unwrap().unwrap(), b"raw bytes");

        files.delete_document("x.md").await.unwrap();
        assert!(files.read_raw("x.md").await.unwrap().is_none());
        // Deleting twice is fine
        files.delete_document("x.md").await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_backend() {
        let dir = tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path().join("docs"));
        backend.validate().await.unwrap();
        assert!(!dir.path().join("docs").join(".health-check").exists());
    }
}
