//! HTTP handlers for folio-api.

pub mod documents;
pub mod health;

pub use documents::{
    create_document, get_document, get_document_by_id, list_documents, update_document,
};
pub use health::health_check;
