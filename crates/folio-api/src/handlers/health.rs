//! Liveness endpoint.

use axum::{extract::State, Json};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "documents": state.repo.len().await,
    }))
}
