//! Playo server entry point.

use std::sync::Arc;

use anyhow::Context;
use bridge_desktop::ReqwestHttpClient;
use bridge_traits::media::MediaStore;
use core_library::db::{create_pool, DatabaseConfig};
use core_library::SqliteSongRepository;
use core_runtime::config::{missing_env_vars, AppConfig};
use core_runtime::logging::{init_logging, LoggingConfig};
use core_service::{api, LibraryService};
use provider_cloudinary::CloudinaryMediaStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in production
    let _ = dotenvy::dotenv();

    let lookup = |key: &str| std::env::var(key).ok();
    init_logging(LoggingConfig::default().with_env_overrides(lookup)?)?;

    check_environment();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        bind_address = %config.bind_address,
        upload_folder = %config.media_store.upload_folder,
        "Configuration loaded"
    );

    let pool = create_pool(DatabaseConfig::new(config.database_url.clone()))
        .await
        .context("failed to open database")?;
    let songs = Arc::new(SqliteSongRepository::new(pool));

    let http_client = Arc::new(ReqwestHttpClient::new()?);
    let media_store = Arc::new(CloudinaryMediaStore::new(
        http_client,
        config.media_store.clone(),
    ));

    match media_store.ping().await {
        Ok(()) => info!("Media store reachable"),
        Err(e) => warn!(error = %e, "Media store ping failed; uploads may fail"),
    }

    let service = LibraryService::new(media_store, songs);
    let app = api::router(service, config.max_request_bytes);

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(address = %config.bind_address, "Playo listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Report which required variables are missing. Startup continues either way;
/// configuration validation decides whether the server can run.
fn check_environment() {
    let missing = missing_env_vars(|key| std::env::var(key).ok());
    if missing.is_empty() {
        info!("All required environment variables are set");
        return;
    }
    for name in missing {
        warn!(variable = name, "Missing environment variable");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
