mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod service;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::{Config, StoreConfig};
use service::PatientService;
use state::AppState;
use store::{InMemoryPatientStore, PatientStore, SpannerPatientStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("patient_api=info,tower_http=info")),
        )
        .init();

    tracing::info!("patient-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn PatientStore> = match &config.store {
        StoreConfig::Spanner(spanner) => Arc::new(SpannerPatientStore::from_config(spanner).await?),
        StoreConfig::Memory => Arc::new(InMemoryPatientStore::new()),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        patients: PatientService::new(store),
        config: Arc::new(config),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("patient-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
