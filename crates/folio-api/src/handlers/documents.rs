//! Document HTTP handlers.
//!
//! Thin adapters between JSON request/response shapes and
//! [`DocumentRepository`](folio_store::DocumentRepository). Write handlers
//! answer with `{"msg": "..."}`; failures go through [`ApiError`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{ApiError, AppState};
use folio_core::{CreateDocumentPayload, CreateOutcome, Document, Metadata, UpsertOutcome};

/// Body of write responses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    fn new(msg: impl Into<String>) -> Json<Self> {
        Json(Self { msg: msg.into() })
    }
}

/// List every manifest record.
///
/// # Returns
/// - 200 OK with the manifest as a JSON array
pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<Metadata>> {
    let records = state.repo.list().await;
    info!(record_count = records.len(), "file list requested");
    Json(records)
}

/// Get a document by file name.
///
/// # Returns
/// - 200 OK with metadata and content
/// - 404 Not Found if no manifest record has this `fileName`, or its file is missing
pub async fn get_document(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<Document>, ApiError> {
    info!(file_name = %file_name, "GET document");
    let doc = state.repo.fetch_by_file_name(&file_name).await?;
    Ok(Json(doc))
}

/// Get a document by id.
///
/// # Returns
/// - 200 OK with metadata and content
/// - 404 Not Found if no manifest record has this `id`
pub async fn get_document_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    info!(document_id = %id, "GET document by id");
    let doc = state.repo.fetch_by_id(&id).await?;
    Ok(Json(doc))
}

/// Create a document. Never overwrites.
///
/// # Returns
/// - 200 OK `{"msg": "OK"}`
/// - 400 Bad Request `{"msg": "Token does not match"}` when a write token is
///   configured and the payload carries a different one
/// - 409 Conflict `{"msg": "file already exists"}` if the `id` is taken
/// - 409 Conflict if the `fileName` belongs to another document
pub async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<CreateDocumentPayload>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    info!("processing POST request");

    if let Some(expected) = state.write_token.as_deref() {
        if payload.token.as_deref() != Some(expected) {
            warn!(file_name = %payload.document.file_name(), "Create rejected: token does not match");
            return Ok((
                StatusCode::BAD_REQUEST,
                MessageResponse::new("Token does not match"),
            ));
        }
    }

    let file_name = payload.document.file_name().to_string();
    match state.repo.create(payload.document).await? {
        CreateOutcome::Created => {
            info!(file_name = %file_name, "pushing document");
            Ok((StatusCode::OK, MessageResponse::new("OK")))
        }
        CreateOutcome::AlreadyExists => {
            info!(file_name = %file_name, "duplicate document");
            Ok((
                StatusCode::CONFLICT,
                MessageResponse::new("file already exists"),
            ))
        }
    }
}

/// Insert or replace a document keyed on `id`.
///
/// # Returns
/// - 200 OK `{"msg": "Added: <fileName>"}` or `{"msg": "Updated: <fileName>"}`
/// - 409 Conflict if the `fileName` belongs to another document
pub async fn update_document(
    State(state): State<AppState>,
    Json(document): Json<Document>,
) -> Result<Json<MessageResponse>, ApiError> {
    let file_name = document.file_name().to_string();
    let msg = match state.repo.upsert(document).await? {
        UpsertOutcome::Added => format!("Added: {}", file_name),
        UpsertOutcome::Updated => format!("Updated: {}", file_name),
    };
    Ok(MessageResponse::new(msg))
}
