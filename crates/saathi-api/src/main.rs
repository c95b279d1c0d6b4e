//! # saathi-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the location ingest service.
//! Binds to `PORT` (default 4000).

use std::sync::Arc;

use saathi_api::config::{AppConfig, LogFormat, StorageBackend};
use saathi_api::db::locations::PgLocationStore;
use saathi_api::db::memory::MemoryLocationStore;
use saathi_api::db::LocationStore;
use saathi_api::state::AppState;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    init_tracing(LogFormat::from_env());

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration invalid: {e}");
        e
    })?;
    config.warn_on_defaults();

    let store: Arc<dyn LocationStore> = match config.storage {
        StorageBackend::Postgres => {
            let pool = saathi_api::db::init_pool(&config).await.map_err(|e| {
                tracing::error!("Database initialization failed: {e}");
                e
            })?;
            Arc::new(PgLocationStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("SAATHI_STORAGE=memory: records will not survive restarts");
            Arc::new(MemoryLocationStore::new())
        }
    };

    let port = config.port;
    let app = saathi_api::app(AppState::new(config, store));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Safar Saathi API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("received SIGTERM, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
