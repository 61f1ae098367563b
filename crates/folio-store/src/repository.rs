//! Manifest reconciliation: the insert-or-update logic behind every write.
//!
//! The repository owns the in-memory manifest. Identity is `id`; a write whose
//! `id` is not in the manifest appends, one whose `id` is present replaces that
//! record field-for-field. Every mutation runs under the write half of a single
//! `RwLock`, so read-modify-write-persist sequences never interleave.
//!
//! ## Write ordering
//!
//! 1. Document body (atomic rename)
//! 2. Manifest (atomic rename)
//! 3. In-memory manifest
//!
//! If step 2 fails the previous document body is restored (or the new file
//! removed) and the in-memory manifest is left untouched.

use folio_core::{
    CreateOutcome, Document, DocumentStorage, Error, ManifestStore, Metadata, Result,
    UpsertOutcome,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// True when no record in `records` has `id`.
pub fn is_not_present(records: &[Metadata], id: &str) -> bool {
    !records.iter().any(|r| r.id == id)
}

/// Replace every record whose `id` matches `incoming.id`, leaving the rest unchanged.
pub fn replace_by_id(records: &[Metadata], incoming: &Metadata) -> Vec<Metadata> {
    records
        .iter()
        .map(|r| {
            if r.id == incoming.id {
                incoming.clone()
            } else {
                r.clone()
            }
        })
        .collect()
}

/// Record that already uses `file_name` under a different `id`, if any.
pub fn file_name_owner<'a>(
    records: &'a [Metadata],
    file_name: &str,
    id: &str,
) -> Option<&'a Metadata> {
    records
        .iter()
        .find(|r| r.file_name == file_name && r.id != id)
}

/// Document repository backed by a manifest store and per-document storage.
pub struct DocumentRepository {
    manifest: RwLock<Vec<Metadata>>,
    manifest_store: Box<dyn ManifestStore>,
    documents: Box<dyn DocumentStorage>,
}

impl DocumentRepository {
    /// Load the manifest and build a repository around it.
    ///
    /// Fails when the manifest is absent or malformed.
    pub async fn open(
        manifest_store: impl ManifestStore + 'static,
        documents: impl DocumentStorage + 'static,
    ) -> Result<Self> {
        let records = manifest_store.load().await?;
        info!(record_count = records.len(), "Document repository opened");
        Ok(Self::with_records(records, manifest_store, documents))
    }

    /// Build a repository around records that were already loaded.
    pub fn with_records(
        records: Vec<Metadata>,
        manifest_store: impl ManifestStore + 'static,
        documents: impl DocumentStorage + 'static,
    ) -> Self {
        Self {
            manifest: RwLock::new(records),
            manifest_store: Box::new(manifest_store),
            documents: Box::new(documents),
        }
    }

    /// Snapshot of the whole manifest in order.
    pub async fn list(&self) -> Vec<Metadata> {
        self.manifest.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.manifest.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.manifest.read().await.is_empty()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Metadata> {
        self.manifest
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// First record with a matching `fileName`.
    pub async fn find_by_file_name(&self, file_name: &str) -> Option<Metadata> {
        self.manifest
            .read()
            .await
            .iter()
            .find(|r| r.file_name == file_name)
            .cloned()
    }

    /// Fetch the full document for the first record named `file_name`.
    pub async fn fetch_by_file_name(&self, file_name: &str) -> Result<Document> {
        let manifest = self.manifest.read().await;
        let metadata = manifest
            .iter()
            .find(|r| r.file_name == file_name)
            .ok_or_else(|| Error::NotFound(format!("Document '{}' not found", file_name)))?;
        self.documents.fetch_document(metadata).await
    }

    /// Fetch the full document whose `id` matches.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Document> {
        let manifest = self.manifest.read().await;
        let metadata = manifest
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Document with id '{}' not found", id)))?;
        self.documents.fetch_document(metadata).await
    }

    /// Insert-or-update keyed on `id`.
    ///
    /// The incoming record fully replaces an existing one. Fails with
    /// `Error::Conflict` if its `fileName` belongs to a different `id`.
    pub async fn upsert(&self, document: Document) -> Result<UpsertOutcome> {
        document.metadata.validate()?;

        let mut manifest = self.manifest.write().await;
        reject_file_name_collision(&manifest, &document.metadata)?;

        let previous = manifest
            .iter()
            .find(|r| r.id == document.metadata.id)
            .map(|r| r.file_name.clone());

        let (next, outcome) = if is_not_present(&manifest, &document.metadata.id) {
            let mut next = manifest.clone();
            next.push(document.metadata.clone());
            (next, UpsertOutcome::Added)
        } else {
            (
                replace_by_id(&manifest, &document.metadata),
                UpsertOutcome::Updated,
            )
        };

        debug!(
            document_id = %document.metadata.id,
            file_name = %document.metadata.file_name,
            outcome = outcome.as_str(),
            "Reconciled write against manifest"
        );

        self.commit(&mut manifest, next, &document).await?;

        // A rename leaves the old body behind; it is no longer referenced.
        if let Some(old_name) = previous.filter(|old| *old != document.metadata.file_name) {
            if let Err(e) = self.documents.delete_document(&old_name).await {
                warn!(file_name = %old_name, error = %e, "Failed to remove renamed document file");
            }
        }

        info!(
            document_id = %document.metadata.id,
            file_name = %document.metadata.file_name,
            outcome = outcome.as_str(),
            "Document persisted"
        );
        Ok(outcome)
    }

    /// Insert only. An `id` already in the manifest leaves everything unchanged.
    pub async fn create(&self, document: Document) -> Result<CreateOutcome> {
        document.metadata.validate()?;

        let mut manifest = self.manifest.write().await;
        if !is_not_present(&manifest, &document.metadata.id) {
            info!(
                document_id = %document.metadata.id,
                file_name = %document.metadata.file_name,
                "Duplicate document id, create refused"
            );
            return Ok(CreateOutcome::AlreadyExists);
        }
        reject_file_name_collision(&manifest, &document.metadata)?;

        let mut next = manifest.clone();
        next.push(document.metadata.clone());
        self.commit(&mut manifest, next, &document).await?;

        info!(
            document_id = %document.metadata.id,
            file_name = %document.metadata.file_name,
            "Document created"
        );
        Ok(CreateOutcome::Created)
    }

    /// Persist `document` then `next`, and only then swap `next` into memory.
    async fn commit(
        &self,
        manifest: &mut Vec<Metadata>,
        next: Vec<Metadata>,
        document: &Document,
    ) -> Result<()> {
        let file_name = document.file_name();
        let previous_body = self.documents.read_raw(file_name).await?;

        if let Err(e) = self.documents.write_document(document).await {
            error!(file_name, error = %e, "Document write failed, manifest untouched");
            return Err(Error::Persistence(format!(
                "failed to write document '{}': {}",
                file_name, e
            )));
        }

        if let Err(e) = self.manifest_store.save(&next).await {
            error!(file_name, error = %e, "Manifest save failed, rolling back document");
            self.rollback_document(file_name, previous_body).await;
            return Err(Error::Persistence(format!(
                "failed to save manifest after writing '{}': {}",
                file_name, e
            )));
        }

        *manifest = next;
        Ok(())
    }

    async fn rollback_document(&self, file_name: &str, previous_body: Option<Vec<u8>>) {
        let result = match previous_body {
            Some(bytes) => self.documents.restore_raw(file_name, &bytes).await,
            None => self.documents.delete_document(file_name).await,
        };
        if let Err(e) = result {
            error!(
                file_name,
                error = %e,
                "Rollback failed, manifest and document files have diverged"
            );
        }
    }
}

fn reject_file_name_collision(records: &[Metadata], incoming: &Metadata) -> Result<()> {
    match file_name_owner(records, &incoming.file_name, &incoming.id) {
        Some(owner) => {
            warn!(
                file_name = %incoming.file_name,
                document_id = %incoming.id,
                owner_id = %owner.id,
                "fileName already used by another document"
            );
            Err(Error::Conflict(format!(
                "fileName '{}' is already used by document '{}'",
                incoming.file_name, owner.id
            )))
        }
        None => Ok(()),
    }
}
