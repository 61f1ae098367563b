//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;
use tracing::error;

/// Errors returned by handlers. Rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(folio_core::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
}

impl From<folio_core::Error> for ApiError {
    fn from(err: folio_core::Error) -> Self {
        match err {
            folio_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            folio_core::Error::DocumentNotFound(name) => {
                ApiError::NotFound(format!("Document file '{}' is missing", name))
            }
            folio_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            folio_core::Error::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_statuses() {
        let cases = [
            (folio_core::Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                folio_core::Error::DocumentNotFound("x.md".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                folio_core::Error::InvalidInput("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (folio_core::Error::Conflict("x".into()), StatusCode::CONFLICT),
            (
                folio_core::Error::Persistence("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                folio_core::Error::Yaml("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_store_error_message_is_preserved() {
        let err = ApiError::from(folio_core::Error::Persistence("disk full".into()));
        assert_eq!(err.to_string(), "Persistence error: disk full");
    }

    #[test]
    fn test_into_response_status() {
        let resp = ApiError::NotFound("gone".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
