//! Error types for folio.

use thiserror::Error;

/// Result type alias using folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Manifest lists the document but its file is missing
    #[error("Document file not found: {0}")]
    DocumentNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write collides with an existing record
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Manifest and document files could not be kept in step
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// YAML encode/decode failed
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Yaml(e.to_string())
    }
}

impl Error {
    /// True for the lookup-miss variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::DocumentNotFound(_))
    }
}
