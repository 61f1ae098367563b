//! folio-api - HTTP server for the folio document repository

use anyhow::Context;
use tracing::info;

use folio_api::{build_router, AppState, ServerConfig};
use folio_store::{open_repository, FilesystemBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = folio_api::telemetry::init_tracing();

    let config = ServerConfig::from_env();
    info!(
        manifest_path = %config.manifest_path.display(),
        documents_dir = %config.documents_dir.display(),
        write_token = if config.http.write_token.is_some() { "required" } else { "not checked" },
        allowed_origins = %config.http.allowed_origins,
        "Configuration loaded"
    );

    // Fail fast on an unusable documents directory.
    let backend = FilesystemBackend::new(&config.documents_dir);
    backend
        .validate()
        .await
        .map_err(|e| anyhow::anyhow!("document storage unusable: {}", e))?;

    // A missing or malformed manifest is fatal.
    let repo = open_repository(
        &config.manifest_path,
        &config.documents_dir,
        config.init_manifest,
    )
    .await
    .with_context(|| format!("loading manifest {}", config.manifest_path.display()))?;

    let state = AppState::new(repo, config.http.write_token.clone());
    let app = build_router(state, &config.http);

    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
