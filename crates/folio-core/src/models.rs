//! Data model shared by the store and the HTTP layer.
//!
//! Field names are camelCase on the wire and in the manifest file
//! (`fileName`, `timeCreated`, `belongsTo`, ...).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::file_safety::validate_file_name;
use crate::{Error, Result};

/// One manifest record.
///
/// `id` is the identity used for insert-vs-update decisions. `file_name` keys
/// the stored document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub id: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_updated: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,
    /// Parent collection this document belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belongs_to: Option<String>,
}

impl Metadata {
    /// Minimal record with only the two required fields set.
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            author: None,
            time_created: None,
            time_updated: None,
            tags: BTreeSet::new(),
            categories: BTreeSet::new(),
            title: None,
            subtitle: None,
            r#abstract: None,
            belongs_to: None,
        }
    }

    /// Reject records the store cannot safely persist.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidInput("id is required".to_string()));
        }
        validate_file_name(&self.file_name)
    }
}

/// Metadata plus the document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub metadata: Metadata,
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(metadata: Metadata, content: impl Into<String>) -> Self {
        Self {
            metadata,
            content: content.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn file_name(&self) -> &str {
        &self.metadata.file_name
    }
}

/// Body of a create request. Carries the optional shared write token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub document: Document,
}

/// Result of an insert-or-update write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Added,
    Updated,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Added => "added",
            UpsertOutcome::Updated => "updated",
        }
    }
}

/// Result of a create-only write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}
