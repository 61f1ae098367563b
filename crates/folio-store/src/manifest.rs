//! The YAML manifest: a top-level sequence of metadata records.
//!
//! Loaded once at startup and rewritten wholesale after every mutation.
//! Saves go through a temp file and rename, so a crash mid-write leaves the
//! previous manifest intact instead of a truncated one.

use async_trait::async_trait;
use folio_core::{Error, ManifestStore, Metadata, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::file_storage::write_atomic;

/// Decode manifest text. Empty (or comment-only) text is an empty manifest.
pub fn decode(text: &str) -> Result<Vec<Metadata>> {
    let blank = text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Encode records as a YAML sequence.
pub fn encode(records: &[Metadata]) -> Result<String> {
    Ok(serde_yaml::to_string(records)?)
}

/// Manifest persisted at a single file path.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty manifest if no file exists yet. Returns true if one was created.
    pub async fn init_if_missing(&self) -> Result<bool> {
        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.save(&[]).await?;
        info!(manifest_path = %self.path.display(), "Created empty manifest");
        Ok(true)
    }
}

#[async_trait]
impl ManifestStore for ManifestFile {
    async fn load(&self) -> Result<Vec<Metadata>> {
        let raw = fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("manifest {}", self.path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        let text = String::from_utf8(raw)
            .map_err(|e| Error::Yaml(format!("manifest is not UTF-8: {}", e)))?;
        let records = decode(&text)?;
        debug!(manifest_path = %self.path.display(), record_count = records.len(), "Manifest loaded");
        Ok(records)
    }

    async fn save(&self, records: &[Metadata]) -> Result<()> {
        let text = encode(records)?;
        write_atomic(&self.path, text.as_bytes()).await?;
        debug!(manifest_path = %self.path.display(), record_count = records.len(), "Manifest saved");
        Ok(())
    }
}
