//! folio-api - HTTP API for the folio document repository
//!
//! Routes:
//!
//! | Method | Path                      | Handler |
//! |--------|---------------------------|---------|
//! | GET    | `/health`                 | [`handlers::health_check`] |
//! | GET    | `/documents`              | [`handlers::list_documents`] |
//! | POST   | `/documents`              | [`handlers::create_document`] |
//! | PUT    | `/documents`              | [`handlers::update_document`] |
//! | GET    | `/documents/:fileName`    | [`handlers::get_document`] |
//! | GET    | `/documents/id/:id`       | [`handlers::get_document_by_id`] |

pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use folio_store::DocumentRepository;

pub use config::{HttpConfig, ServerConfig};
pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<DocumentRepository>,
    /// Create requests must carry this token when set.
    pub write_token: Option<String>,
}

impl AppState {
    pub fn new(repo: DocumentRepository, write_token: Option<String>) -> Self {
        Self {
            repo: Arc::new(repo),
            write_token,
        }
    }
}

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// CORS
// =============================================================================

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Parse allowed origins from a comma-separated list.
///
/// `*` (or an empty string) allows any origin, which is what browser
/// front-ends served from elsewhere expect. Invalid entries are skipped
/// with a warning.
pub fn parse_allowed_origins(origins_str: &str) -> AllowOrigin {
    let trimmed = origins_str.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = trimmed
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", s, e);
                    None
                }
            }
        })
        .collect();

    AllowOrigin::list(origins)
}

/// CORS policy for the document routes.
pub fn cors_layer(config: &HttpConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(parse_allowed_origins(&config.allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            X_REQUESTED_WITH,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ])
}

/// Allowed methods/headers advertised on every response of a route, not just
/// on preflight. Preflight answers from [`cors_layer`] are left as they are.
fn advertise_cors(methods: &'static str) -> AdvertiseCors {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(methods),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ADVERTISED_HEADERS),
        ))
}

type AdvertiseCors = ServiceBuilder<
    Stack<SetResponseHeaderLayer<HeaderValue>, Stack<SetResponseHeaderLayer<HeaderValue>, Identity>>,
>;

const ADVERTISED_HEADERS: &str = "X-Requested-With, Content-Type, Accept, Origin";

// =============================================================================
// ROUTER
// =============================================================================

/// Build the full application router with middleware.
pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/documents",
            get(handlers::list_documents)
                .post(handlers::create_document)
                .put(handlers::update_document)
                .layer(advertise_cors("GET, POST, PUT, OPTIONS")),
        )
        .route(
            "/documents/id/:id",
            get(handlers::get_document_by_id).layer(advertise_cors("GET, OPTIONS")),
        )
        .route(
            "/documents/:file_name",
            get(handlers::get_document).layer(advertise_cors("GET, OPTIONS")),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(cors_layer(config)),
        )
        // The configured limit replaces axum's 2 MiB extractor default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_uuid_v7() {
        let req = axum::http::Request::new(());
        let id = MakeRequestUuidV7.make_request_id(&req).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}
